use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No rows to analyze")]
    EmptyInput,
    #[error("Cannot find required columns: {0}")]
    MissingColumns(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("File processing error: {0}")]
    FileProcessing(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_)
            | AppError::EmptyInput
            | AppError::MissingColumns(_)
            | AppError::Http(_) => StatusCode::BAD_REQUEST,
            AppError::FileProcessing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
