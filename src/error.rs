use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::users::StoreError;

/// Every failure a request can end with. The body of the response is the
/// plain-text message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,

    #[error("Password is not correct")]
    PasswordMismatch,

    #[error("Missing or malformed Authorization header")]
    MissingOrMalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    UserExists,

    #[error("Token does not grant access to this user")]
    Forbidden,

    #[error("User was modified concurrently, retry the request")]
    Conflict,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound
            | ApiError::PasswordMismatch
            | ApiError::MissingOrMalformedHeader
            | ApiError::InvalidToken
            | ApiError::Validation(_)
            | ApiError::UserExists => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "request failed");
        }
        (self.status(), self.to_string()).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => ApiError::UserExists,
            StoreError::Conflict(_) => ApiError::Conflict,
            StoreError::Database(e) => {
                ApiError::Internal(anyhow::Error::new(e).context("user store"))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}
