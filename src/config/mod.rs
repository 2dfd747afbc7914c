use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::errors::AppError;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_DEEPFACE_URL: &str = "http://127.0.0.1:5005";
const DEFAULT_MODEL: &str = "Facenet";
const DEFAULT_DETECTOR: &str = "mtcnn";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_MAX_CONCURRENT_IMAGES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub store: StoreBackend,
    pub deepface_url: Url,
    pub deepface_model: String,
    pub deepface_detector: String,
    pub deepface_timeout: Duration,
    pub image_archive_dir: Option<PathBuf>,
    pub max_payload_bytes: usize,
    pub max_concurrent_images: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store = match get("STORE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError("DATABASE_URL must be set".to_string())
                })?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(AppError::ConfigError(format!(
                    "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                    other
                )))
            }
        };

        let mut deepface_url = get("DEEPFACE_URL").unwrap_or_else(|| DEFAULT_DEEPFACE_URL.to_string());
        // relative joins keep the base path only with a trailing slash
        if !deepface_url.ends_with('/') {
            deepface_url.push('/');
        }
        let deepface_url = Url::parse(&deepface_url)
            .map_err(|err| AppError::ConfigError(format!("DEEPFACE_URL: {}", err)))?;

        let max_concurrent_images = parse_or(
            "MAX_CONCURRENT_IMAGES",
            get("MAX_CONCURRENT_IMAGES"),
            DEFAULT_MAX_CONCURRENT_IMAGES,
        )?;
        if max_concurrent_images == 0 {
            return Err(AppError::ConfigError(
                "MAX_CONCURRENT_IMAGES must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            store,
            deepface_url,
            deepface_model: get("DEEPFACE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            deepface_detector: get("DEEPFACE_DETECTOR")
                .unwrap_or_else(|| DEFAULT_DETECTOR.to_string()),
            deepface_timeout: Duration::from_secs(parse_or(
                "DEEPFACE_TIMEOUT_SECS",
                get("DEEPFACE_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
            image_archive_dir: get("IMAGE_ARCHIVE_DIR").map(PathBuf::from),
            max_payload_bytes: parse_or(
                "MAX_PAYLOAD_BYTES",
                get("MAX_PAYLOAD_BYTES"),
                DEFAULT_MAX_PAYLOAD_BYTES,
            )?,
            max_concurrent_images,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, AppError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} is not a valid number: '{}'", key, raw))),
        None => Ok(default),
    }
}
