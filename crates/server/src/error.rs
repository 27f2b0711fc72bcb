#![forbid(unsafe_code)]

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lt_core::ids::NameError;

/// Failure of one request. Bodies are plain text; store failures are
/// logged where they happen and reach the client only as a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn invalid_name(field: &str, err: NameError) -> Self {
        Self::BadRequest(format!("invalid {field}: {}", err.message()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
