//! Request handlers.

pub mod engine;
pub mod swap;

use axum::extract::rejection::JsonRejection;
use sswap_types::APIError;

/// Maps a body extraction failure to a 400 response.
pub(crate) fn json_rejection(rejection: JsonRejection) -> APIError {
	APIError::bad_request(rejection.body_text())
}
