// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Password hashing failed")]
    PasswordHashingError,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),

    // --- Domain errors, surfaced to the caller as-is ---
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unexpected internal error")]
    InternalServerError,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

impl AppError {
    /// Turns a UNIQUE constraint violation into `Duplicate(message)`, anything else stays a db error.
    pub fn from_insert(err: sqlx::Error, message: &str) -> AppError {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Duplicate(message.to_string())
            }
            _ => AppError::SqlxError(err),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let message = match &self {
            AppError::NotFound(msg) | AppError::Duplicate(msg) | AppError::BadRequest(msg) => {
                tracing::warn!("Request rejected ({}): {}", status.as_u16(), msg);
                msg.clone()
            }
            AppError::InvalidCredentials => {
                tracing::warn!("Login rejected: invalid credentials");
                "ID atau password salah.".to_string()
            }
            AppError::Unauthorized => "Silakan login terlebih dahulu.".to_string(),
            AppError::Forbidden => "Anda tidak memiliki akses.".to_string(),
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                tracing::error!("Processed error: {:?}", self);
                "Gagal mengakses data.".to_string()
            }
            AppError::EnvVarError(_) | AppError::ConfigError(_) => {
                tracing::error!("Processed error: {:?}", self);
                "Kesalahan konfigurasi server.".to_string()
            }
            _ => {
                tracing::error!("Processed error: {:?}", self);
                "Terjadi kesalahan pada server.".to_string()
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

// Default Result type for the application
pub type AppResult<T = ()> = Result<T, AppError>;
