//! Persistence for settlement receipts.
//!
//! Backends implement the byte-level [`StorageInterface`]; the service talks
//! to them through [`StorageService`], which stores JSON values under
//! `namespace:id` keys.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sswap_types::{ConfigSchema, ImplementationRegistry, StorageKey};
use thiserror::Error;

pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// No entry exists under the requested key.
	#[error("Not found")]
	NotFound,
	/// A value could not be encoded to or decoded from JSON.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// The underlying backend failed, e.g. an I/O error.
	#[error("Backend error: {0}")]
	Backend(String),
	/// The backend configuration was rejected.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Byte-level key/value backend.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Returns the raw bytes stored under `key`, or `NotFound`.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores `value` under `key`, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Removing a missing key is not an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Schema used to validate this backend's configuration table.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Constructs a backend from its `[storage.implementations.<name>]` table.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Marker for storage implementations registered by name.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// All storage implementations as `(name, factory)` pairs.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Typed JSON storage over a backend.
pub struct StorageService {
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Wraps a backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: StorageKey, id: &str) -> String {
		format!("{}:{}", namespace.as_str(), id)
	}

	/// Stores `data` as JSON, replacing any previous value.
	pub async fn store<T: Serialize>(
		&self,
		namespace: StorageKey,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Loads and decodes the value stored under `namespace:id`.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: StorageKey,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;
	use alloy_primitives::{Address, B256, U256};
	use sswap_types::SwapEvent;

	fn receipt() -> SwapEvent {
		SwapEvent {
			order_hash: B256::repeat_byte(0x42),
			maker: Address::repeat_byte(0x01),
			taker: Address::repeat_byte(0x02),
			nonce: U256::from(7),
			maker_token: Address::repeat_byte(0xbb),
			maker_amount: U256::from(10),
			taker_token: Address::repeat_byte(0xaa),
			taker_amount: U256::from(20),
		}
	}

	#[tokio::test]
	async fn test_typed_store_and_retrieve() {
		let service = StorageService::new(Box::new(MemoryStorage::new()));
		let event = receipt();
		let id = event.order_hash.to_string();

		assert!(matches!(
			service.retrieve::<SwapEvent>(StorageKey::Swaps, &id).await,
			Err(StorageError::NotFound)
		));

		service.store(StorageKey::Swaps, &id, &event).await.unwrap();
		let loaded: SwapEvent = service.retrieve(StorageKey::Swaps, &id).await.unwrap();
		assert_eq!(loaded, event);
	}

	#[tokio::test]
	async fn test_retrieve_wrong_shape_is_serialization_error() {
		let backend = MemoryStorage::new();
		backend.set_bytes("swaps:bad", b"not json".to_vec()).await.unwrap();
		let service = StorageService::new(Box::new(backend));
		assert!(matches!(
			service.retrieve::<SwapEvent>(StorageKey::Swaps, "bad").await,
			Err(StorageError::Serialization(_))
		));
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}
