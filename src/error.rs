use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User {0} already exists")]
    DuplicateUser(String),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Image download failed: {0}")]
    ImageDownload(String),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Uniform error envelope. The frontend branches on `status`, so errors are
/// always delivered as a 200 with this body, never as a transport failure.
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Json(ErrorEnvelope {
            status: "error",
            message: self.to_string(),
        })
        .into_response()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(Box::new(e))
    }
}
