use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Empty or malformed series handed to the signal engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or exchange failure; transient from the caller's point of view.
    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Exchange rejected the supplied credentials.
    #[error("Exchange authentication failed: {0}")]
    ConnectorAuth(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExternalApi(_) | AppError::Reqwest(_) => StatusCode::BAD_GATEWAY,
            AppError::ConnectorAuth(_) => StatusCode::UNAUTHORIZED,
            AppError::SerdeJson(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) | AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ExternalApi(msg)
            | AppError::ConnectorAuth(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Reqwest(e) => e.to_string(),
            AppError::SerdeJson(e) => e.to_string(),
            AppError::Anyhow(e) => e.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
