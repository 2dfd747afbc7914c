mod archive;
mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod recognition;
mod services;
mod utils;

#[cfg(test)]
mod testing;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

use crate::archive::ImageArchive;
use crate::config::{Config, StoreBackend};
use crate::db::{InMemoryStore, PgRecordStore, RecordStore};
use crate::errors::AppError;
use crate::recognition::{DeepFaceClient, FaceAnalyzer};
use crate::services::EmployeeService;

fn startup_error(err: AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

async fn build_service(config: &Config) -> Result<EmployeeService, AppError> {
    let store: Arc<dyn RecordStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            Arc::new(PgRecordStore::connect(database_url).await?)
        }
        StoreBackend::Memory => {
            info!("Using in-memory record store; data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let analyzer: Arc<dyn FaceAnalyzer> = Arc::new(DeepFaceClient::new(
        &config.deepface_url,
        &config.deepface_model,
        &config.deepface_detector,
        config.deepface_timeout,
    )?);
    info!(
        "Face analysis via {} (model {}, detector {})",
        config.deepface_url, config.deepface_model, config.deepface_detector
    );

    let mut service = EmployeeService::new(store, analyzer)
        .with_image_concurrency(config.max_concurrent_images);
    if let Some(dir) = &config.image_archive_dir {
        let archive = ImageArchive::open(dir).await?;
        info!("Archiving images under {}", archive.root().display());
        service = service.with_archive(archive);
    }
    Ok(service)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(startup_error)?;
    let service = web::Data::new(build_service(&config).await.map_err(startup_error)?);
    let max_payload_bytes = config.max_payload_bytes;

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .configure(handlers::api(max_payload_bytes))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
