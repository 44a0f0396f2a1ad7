//! HTTP server for the swap API.

use crate::apis;
use axum::{
	http::{HeaderName, HeaderValue, Method},
	routing::{get, post},
	Router,
};
use sswap_config::{ApiConfig, CorsConfig};
use sswap_core::SSwap;
use sswap_ledger::TokenLedger;
use sswap_storage::StorageService;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	trace::TraceLayer,
};

/// Engine over whichever ledger the configuration selected.
pub type Engine = SSwap<Box<dyn TokenLedger>>;

/// Shared state for request handlers.
///
/// The engine sits behind a mutex so swaps are applied one at a time in
/// the order their requests acquire it.
#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<Mutex<Engine>>,
	pub storage: Arc<StorageService>,
}

impl AppState {
	pub fn new(engine: Engine, storage: StorageService) -> Self {
		Self {
			engine: Arc::new(Mutex::new(engine)),
			storage: Arc::new(storage),
		}
	}
}

/// Builds the API router with tracing and CORS layers.
///
/// All routes live under `/api`.
pub fn build_router(state: AppState, cors: Option<&CorsConfig>) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/domain", get(apis::engine::get_domain))
				.route("/orders/hash", post(apis::engine::hash_order))
				.route("/nonces/{maker}", get(apis::engine::get_nonce))
				.route("/balances/{token}/{owner}", get(apis::engine::get_balance))
				.route("/swaps", post(apis::swap::submit_swap))
				.route("/swaps/{order_hash}", get(apis::swap::get_swap)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(cors_layer(cors)),
		)
		.with_state(state)
}

/// Permissive unless origins are configured.
fn cors_layer(cors: Option<&CorsConfig>) -> CorsLayer {
	let Some(cors) = cors else {
		return CorsLayer::permissive();
	};

	let origins = if cors.allowed_origins.iter().any(|o| o == "*") {
		AllowOrigin::any()
	} else {
		AllowOrigin::list(
			cors.allowed_origins
				.iter()
				.filter_map(|o| HeaderValue::from_str(o).ok()),
		)
	};

	let mut layer = CorsLayer::new().allow_origin(origins);
	if cors.allowed_methods.is_empty() {
		layer = layer.allow_methods(Any);
	} else {
		layer = layer.allow_methods(
			cors.allowed_methods
				.iter()
				.filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
				.collect::<Vec<_>>(),
		);
	}
	if cors.allowed_headers.is_empty() {
		layer = layer.allow_headers(Any);
	} else {
		layer = layer.allow_headers(
			cors.allowed_headers
				.iter()
				.filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
				.collect::<Vec<_>>(),
		);
	}
	layer
}

/// Binds to the configured address and serves until the listener fails.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(state, api_config.cors.as_ref());

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;
	tracing::info!("Swap API server starting on {}", bind_address);

	axum::serve(listener, app).await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, Address, B256, U256};
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;
	use axum::{
		body::Body,
		http::{Request, StatusCode},
	};
	use serde_json::{json, Value};
	use sswap_ledger::implementations::memory::MemoryLedger;
	use async_trait::async_trait;
	use sswap_storage::implementations::memory::{MemoryStorage, MemoryStorageSchema};
	use sswap_storage::{StorageError, StorageInterface};
	use sswap_types::{ConfigSchema, Order, TokenAmount};
	use tower::ServiceExt;

	const ENGINE: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
	const ADMIN: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const TOKEN_A: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
	const TOKEN_B: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
	const MAKER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
	const TAKER: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

	fn ether(n: u64) -> U256 {
		U256::from(n) * U256::from(10u64).pow(U256::from(18))
	}

	struct UnavailableStorage;

	#[async_trait]
	impl StorageInterface for UnavailableStorage {
		async fn get_bytes(&self, _key: &str) -> Result<Vec<u8>, StorageError> {
			Err(StorageError::Backend("disk unavailable".into()))
		}

		async fn set_bytes(&self, _key: &str, _value: Vec<u8>) -> Result<(), StorageError> {
			Err(StorageError::Backend("disk unavailable".into()))
		}

		async fn delete(&self, _key: &str) -> Result<(), StorageError> {
			Err(StorageError::Backend("disk unavailable".into()))
		}

		async fn exists(&self, _key: &str) -> Result<bool, StorageError> {
			Err(StorageError::Backend("disk unavailable".into()))
		}

		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(MemoryStorageSchema)
		}
	}

	fn test_state() -> AppState {
		state_with_storage(Box::new(MemoryStorage::new()))
	}

	fn state_with_storage(storage: Box<dyn StorageInterface>) -> AppState {
		let mut ledger = MemoryLedger::new();
		ledger.mint(TOKEN_A, TAKER, ether(10)).unwrap();
		ledger.mint(TOKEN_B, MAKER, ether(10)).unwrap();
		ledger.approve(TOKEN_A, TAKER, ENGINE, U256::MAX);
		ledger.approve(TOKEN_B, MAKER, ENGINE, U256::MAX);
		let engine = SSwap::new(ADMIN, ENGINE, 31337, Box::new(ledger) as Box<dyn TokenLedger>);
		AppState::new(engine, StorageService::new(storage))
	}

	fn order(nonce: u64) -> Order {
		Order {
			taker_token_amount: TokenAmount::new(TOKEN_A, ether(1)),
			taker: TAKER,
			maker_token_amount: TokenAmount::new(TOKEN_B, ether(1)),
			maker: MAKER,
			nonce: U256::from(nonce),
			deadline: 16907348320,
			chain_id: 31337,
		}
	}

	fn sign(hash: B256) -> String {
		let signer: PrivateKeySigner =
			"59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
				.parse()
				.unwrap();
		let signature = signer.sign_hash_sync(&hash).unwrap();
		alloy_primitives::hex::encode_prefixed(signature.as_bytes())
	}

	async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
		let response = app.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, body)
	}

	fn get_request(uri: &str) -> Request<Body> {
		Request::builder().uri(uri).body(Body::empty()).unwrap()
	}

	fn post_json(uri: &str, body: &Value) -> Request<Body> {
		Request::builder()
			.method("POST")
			.uri(uri)
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	async fn message_hash(app: &Router, order: &Order) -> B256 {
		let (status, body) = call(app, post_json("/api/orders/hash", &json!(order))).await;
		assert_eq!(status, StatusCode::OK);
		serde_json::from_value(body["messageHash"].clone()).unwrap()
	}

	#[tokio::test]
	async fn test_domain_endpoint() {
		let app = build_router(test_state(), None);
		let (status, body) = call(&app, get_request("/api/domain")).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["name"], "SSWAP");
		assert_eq!(body["version"], "0.1.0");
		assert_eq!(body["chainId"], 31337);
		assert_eq!(
			body["separator"],
			"0xe3aed6b844f12106bbf0a011cff592a9138f93e50e4807cdabfcdc8c087604bd"
		);
	}

	#[tokio::test]
	async fn test_order_hash_endpoint() {
		let app = build_router(test_state(), None);
		let (status, body) = call(&app, post_json("/api/orders/hash", &json!(order(1)))).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(
			body["structHash"],
			"0xcb4310af266814d553a25ff440adaae0c76e6d4fade1ef1158155e24ec8f8a6c"
		);
		assert_eq!(
			body["messageHash"],
			"0xbc648a976563357535d57cd7e227d4940d3f68dc3bfe1072d0472ff0276f45ae"
		);
	}

	#[tokio::test]
	async fn test_swap_flow() {
		let app = build_router(test_state(), None);
		let order = order(1);
		let hash = message_hash(&app, &order).await;
		let request = json!({
			"sender": TAKER,
			"order": order,
			"signature": sign(hash),
		});

		let (status, event) = call(&app, post_json("/api/swaps", &request)).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(event["orderHash"], json!(hash));
		assert_eq!(event["makerAmount"], ether(1).to_string());

		let (status, stored) = call(&app, get_request(&format!("/api/swaps/{}", hash))).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(stored, event);

		let (_, nonce) = call(&app, get_request(&format!("/api/nonces/{}", MAKER))).await;
		assert_eq!(nonce["nonce"], "1");

		let (_, balance) = call(
			&app,
			get_request(&format!("/api/balances/{}/{}", TOKEN_B, TAKER)),
		)
		.await;
		assert_eq!(balance["balance"], ether(1).to_string());

		let (status, replay) = call(&app, post_json("/api/swaps", &request)).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(replay["error"], "NonceUsed");
	}

	#[tokio::test]
	async fn test_swap_settles_when_receipt_write_fails() {
		let app = build_router(state_with_storage(Box::new(UnavailableStorage)), None);
		let order = order(1);
		let hash = message_hash(&app, &order).await;
		let request = json!({
			"sender": TAKER,
			"order": order,
			"signature": sign(hash),
		});

		let (status, event) = call(&app, post_json("/api/swaps", &request)).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(event["orderHash"], json!(hash));

		let (_, nonce) = call(&app, get_request(&format!("/api/nonces/{}", MAKER))).await;
		assert_eq!(nonce["nonce"], "1");

		let (_, balance) = call(
			&app,
			get_request(&format!("/api/balances/{}/{}", TOKEN_B, TAKER)),
		)
		.await;
		assert_eq!(balance["balance"], ether(1).to_string());

		let (status, body) = call(&app, get_request(&format!("/api/swaps/{}", hash))).await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["error"], "STORAGE_ERROR");
	}

	#[tokio::test]
	async fn test_swap_from_wrong_sender() {
		let app = build_router(test_state(), None);
		let order = order(1);
		let hash = message_hash(&app, &order).await;
		let request = json!({
			"sender": MAKER,
			"order": order,
			"signature": sign(hash),
		});

		let (status, body) = call(&app, post_json("/api/swaps", &request)).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["error"], "InvalidSender");

		let (_, nonce) = call(&app, get_request(&format!("/api/nonces/{}", MAKER))).await;
		assert_eq!(nonce["nonce"], "0");
	}

	#[tokio::test]
	async fn test_malformed_requests() {
		let app = build_router(test_state(), None);

		let (status, body) = call(&app, post_json("/api/swaps", &json!({ "sender": 1 }))).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_REQUEST");

		let (status, _) = call(&app, get_request("/api/nonces/0x1234")).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);

		let (status, _) = call(&app, get_request("/api/swaps/not-a-hash")).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_unknown_swap_is_not_found() {
		let app = build_router(test_state(), None);
		let (status, body) = call(
			&app,
			get_request(&format!("/api/swaps/{}", B256::repeat_byte(0x11))),
		)
		.await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "SWAP_NOT_FOUND");
	}

	#[tokio::test]
	async fn test_configured_cors_origin() {
		let cors = CorsConfig {
			allowed_origins: vec!["https://app.example".to_string()],
			allowed_headers: vec![],
			allowed_methods: vec!["GET".to_string()],
		};
		let app = build_router(test_state(), Some(&cors));
		let request = Request::builder()
			.uri("/api/domain")
			.header("origin", "https://app.example")
			.body(Body::empty())
			.unwrap();
		let response = app.oneshot(request).await.unwrap();
		assert_eq!(
			response.headers()["access-control-allow-origin"],
			"https://app.example"
		);
	}
}
