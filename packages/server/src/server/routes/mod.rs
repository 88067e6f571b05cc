//! Route handlers for the job API.

mod files;
mod generate;
mod health;
mod progress;
mod status;

pub use files::files_handler;
pub use generate::generate_handler;
pub use health::health_handler;
pub use progress::progress_handler;
pub use status::status_handler;

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Error body for every non-2xx JSON response. Message text is the only
/// diagnostic surface; there are no structured error codes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}
