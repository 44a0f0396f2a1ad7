//! Swap submission and receipt lookup.

use super::json_rejection;
use crate::server::AppState;
use alloy_primitives::B256;
use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Json,
};
use serde_json::json;
use sswap_core::{CallContext, SwapError, SwapInterface};
use sswap_storage::StorageError;
use sswap_types::{
	current_timestamp, truncate_hash, APIError, StorageKey, SwapEvent, SwapRequest,
};
use std::str::FromStr;
use tracing::error;

fn rejection(e: &SwapError) -> APIError {
	let details = match e {
		SwapError::OrderExpired { deadline, now } => Some(json!({ "deadline": deadline, "now": now })),
		SwapError::InvalidSender { expected, actual } => {
			Some(json!({ "expected": expected, "actual": actual }))
		},
		SwapError::NonceUsed { current, .. } => Some(json!({ "current": current.to_string() })),
		SwapError::InvalidSignature(_) | SwapError::Transfer(_) => None,
	};
	APIError::UnprocessableEntity {
		error_type: e.kind().to_string(),
		message: e.to_string(),
		details,
	}
}

fn storage_failure(e: StorageError) -> APIError {
	error!("Receipt lookup failed: {}", e);
	APIError::InternalServerError {
		error_type: "STORAGE_ERROR".to_string(),
		message: e.to_string(),
	}
}

/// POST /api/swaps
///
/// Settles the order at the service clock and records the receipt.
///
/// Once the engine accepts the order the swap is final, so a failed receipt
/// write is logged and the settled event is still returned.
pub async fn submit_swap(
	State(state): State<AppState>,
	payload: Result<Json<SwapRequest>, JsonRejection>,
) -> Result<Json<SwapEvent>, APIError> {
	let Json(request) = payload.map_err(json_rejection)?;
	let ctx = CallContext::new(request.sender, current_timestamp());

	let event = state
		.engine
		.lock()
		.await
		.swap(&ctx, &request.order, &request.signature)
		.map_err(|e| rejection(&e))?;

	if let Err(e) = state
		.storage
		.store(StorageKey::Swaps, &event.order_hash.to_string(), &event)
		.await
	{
		error!(
			order_hash = %truncate_hash(&event.order_hash),
			"Swap settled but receipt was not stored: {}",
			e
		);
	}

	Ok(Json(event))
}

/// GET /api/swaps/{order_hash}
pub async fn get_swap(
	State(state): State<AppState>,
	Path(order_hash): Path<String>,
) -> Result<Json<SwapEvent>, APIError> {
	let order_hash = B256::from_str(&order_hash)
		.map_err(|e| APIError::bad_request(format!("Invalid order hash: {}", e)))?;

	match state
		.storage
		.retrieve(StorageKey::Swaps, &order_hash.to_string())
		.await
	{
		Ok(event) => Ok(Json(event)),
		Err(StorageError::NotFound) => Err(APIError::NotFound {
			error_type: "SWAP_NOT_FOUND".to_string(),
			message: format!("No settled swap with hash {}", order_hash),
		}),
		Err(e) => Err(storage_failure(e)),
	}
}
