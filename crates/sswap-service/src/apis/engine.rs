//! Read-only engine queries.

use super::json_rejection;
use crate::server::AppState;
use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Json,
};
use sswap_core::SwapInterface;
use sswap_ledger::TokenLedger;
use sswap_types::{
	parse_address, APIError, BalanceResponse, DomainResponse, NonceResponse, Order,
	OrderHashResponse,
};

/// GET /api/domain
pub async fn get_domain(State(state): State<AppState>) -> Json<DomainResponse> {
	let engine = state.engine.lock().await;
	let domain = engine.domain();
	Json(DomainResponse {
		name: domain.name.clone(),
		version: domain.version.clone(),
		chain_id: domain.chain_id,
		verifying_contract: domain.verifying_contract,
		separator: engine.domain_separator(),
	})
}

/// POST /api/orders/hash
pub async fn hash_order(
	State(state): State<AppState>,
	payload: Result<Json<Order>, JsonRejection>,
) -> Result<Json<OrderHashResponse>, APIError> {
	let Json(order) = payload.map_err(json_rejection)?;
	let engine = state.engine.lock().await;
	Ok(Json(OrderHashResponse {
		struct_hash: engine.struct_hash(&order),
		message_hash: engine.message_hash(&order),
	}))
}

/// GET /api/nonces/{maker}
pub async fn get_nonce(
	State(state): State<AppState>,
	Path(maker): Path<String>,
) -> Result<Json<NonceResponse>, APIError> {
	let maker = parse_address(&maker).map_err(APIError::bad_request)?;
	let nonce = state.engine.lock().await.nonce(maker);
	Ok(Json(NonceResponse { maker, nonce }))
}

/// GET /api/balances/{token}/{owner}
pub async fn get_balance(
	State(state): State<AppState>,
	Path((token, owner)): Path<(String, String)>,
) -> Result<Json<BalanceResponse>, APIError> {
	let token = parse_address(&token).map_err(APIError::bad_request)?;
	let owner = parse_address(&owner).map_err(APIError::bad_request)?;
	let balance = state.engine.lock().await.ledger().balance_of(token, owner);
	Ok(Json(BalanceResponse {
		token,
		owner,
		balance,
	}))
}
