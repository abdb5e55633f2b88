use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Configuration(_)
            | AppError::Storage(_)
            | AppError::Unavailable(_)
            | AppError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Validation(message)
            | AppError::Unauthorized(message)
            | AppError::Configuration(message) => message.clone(),
            AppError::Storage { .. } | AppError::Unavailable { .. } | AppError::Corrupt { .. } => {
                error!("{self}");
                GENERIC_FAILURE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
