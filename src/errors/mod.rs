use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    NoOpUpdate(String),
    BadRequest(String),
    PayloadTooLarge(String),
    FaceAnalysis(String),
    Upstream(String),
    DatabaseError(String),
    ArchiveError(String),
    ConfigError(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::NoOpUpdate(msg) => write!(f, "No-op Update: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
            AppError::FaceAnalysis(msg) => write!(f, "Face Analysis Error: {}", msg),
            AppError::Upstream(msg) => write!(f, "Upstream Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ArchiveError(msg) => write!(f, "Archive Error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The detail shown to clients. Server-side faults hide their cause.
    fn client_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::NoOpUpdate(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::FaceAnalysis(msg) => msg.clone(),
            AppError::Upstream(_) => "Face analysis service unavailable".to_string(),
            AppError::DatabaseError(_)
            | AppError::ArchiveError(_)
            | AppError::ConfigError(_)
            | AppError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoOpUpdate(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::FaceAnalysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_)
            | AppError::ArchiveError(_)
            | AppError::ConfigError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            message: self.client_message(),
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
