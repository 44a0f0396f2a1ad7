//! In-memory storage backend. Contents are lost on restart.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use sswap_types::{ConfigSchema, Schema, ValidationError};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage backed by a map in process memory.
///
/// Useful for tests and local runs where receipts need not survive a
/// restart.
#[derive(Default)]
pub struct MemoryStorage {
	/// Entries keyed by `namespace:id`.
	store: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	/// Returns a copy of the stored bytes.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		self.store
			.read()
			.await
			.get(key)
			.cloned()
			.ok_or(StorageError::NotFound)
	}

	/// Inserts or replaces the entry.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		self.store.write().await.insert(key.to_string(), value);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.store.write().await.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self.store.read().await.contains_key(key))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for [`MemoryStorage`].
///
/// The backend takes no parameters, so only an empty table is accepted.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function for the memory backend.
///
/// Takes no parameters.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry entry for the memory storage implementation.
pub struct Registry;

impl sswap_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}
