//! Request and response types for the swap HTTP API.

use crate::order::Order;
use crate::utils::u256_serde;
use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signing domain as reported by `GET /api/domain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResponse {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
	/// Precomputed domain separator.
	pub separator: B256,
}

/// Hashes of a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHashResponse {
	pub struct_hash: B256,
	/// The digest a maker signs.
	pub message_hash: B256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceResponse {
	pub maker: Address,
	/// Highest nonce settled for `maker`, zero if none.
	#[serde(with = "u256_serde")]
	pub nonce: U256,
}

/// Swap submission.
///
/// `sender` stands in for the caller identity the host would authenticate;
/// it must equal `order.taker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
	pub sender: Address,
	pub order: Order,
	/// 65-byte `r || s || v` signature, 0x-hex encoded.
	pub signature: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
	pub token: Address,
	pub owner: Address,
	#[serde(with = "u256_serde")]
	pub balance: U256,
}

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error kind, e.g. `NonceUsed` or `INVALID_REQUEST`.
	pub error: String,
	pub message: String,
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds.
	#[serde(rename = "retryAfter")]
	pub retry_after: Option<u64>,
}

/// API error with its HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed input (400)
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Unknown resource (404)
	NotFound { error_type: String, message: String },
	/// Well-formed request the engine rejected (422)
	UnprocessableEntity {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Internal failure (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: "INVALID_REQUEST".to_string(),
			message: message.into(),
			details: None,
		}
	}

	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::InternalServerError { .. } => 500,
		}
	}

	pub fn to_error_response(&self) -> ErrorResponse {
		let (error, message, details) = match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			}
			| APIError::UnprocessableEntity {
				error_type,
				message,
				details,
			} => (error_type, message, details.clone()),
			APIError::NotFound {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => (error_type, message, None),
		};
		ErrorResponse {
			error: error.clone(),
			message: message.clone(),
			details,
			retry_after: None,
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
