//! File-backed storage.
//!
//! Each key is one JSON file under the configured directory. Writes go to a
//! temporary file that is then renamed over the target, so readers never
//! observe a partially written value.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use sswap_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::path::PathBuf;
use tokio::fs;

/// Directory used when `storage_path` is not configured.
pub const DEFAULT_STORAGE_PATH: &str = "./data/storage";

/// File-based storage implementation.
///
/// Keys map to file names inside `base_path`; the directory is created on
/// first write.
pub struct FileStorage {
	/// Directory holding one file per entry.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a store rooted at `base_path`.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// `swaps:0xab..` becomes `<base>/swaps_0xab...json`.
	fn file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', '\\', ':'], "_");
		self.base_path.join(format!("{}.json", safe_key))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		match fs::read(self.file_path(key)).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	/// Writes through a `.tmp` sibling and renames it into place.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.file_path(key);
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		tracing::debug!(?path, "Wrote storage entry");
		Ok(())
	}

	/// Deleting a missing file succeeds.
	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		match fs::remove_file(self.file_path(key)).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		fs::try_exists(self.file_path(key))
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for [`FileStorage`].
///
/// Accepts an optional, non-empty `storage_path` string.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![],
			vec![Field::new("storage_path", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some("") => Err("storage_path must not be empty".to_string()),
					_ => Ok(()),
				}
			})],
		)
		.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: directory for entry files (default `./data/storage`)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

/// Registry entry for the file storage implementation.
pub struct Registry;

impl sswap_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_write_read_delete() {
		let dir = TempDir::new().unwrap();
		let storage = FileStorage::new(dir.path().join("nested"));

		storage
			.set_bytes("swaps:0xabc", b"{\"a\":1}".to_vec())
			.await
			.unwrap();
		assert!(storage.exists("swaps:0xabc").await.unwrap());
		assert_eq!(
			storage.get_bytes("swaps:0xabc").await.unwrap(),
			b"{\"a\":1}"
		);
		assert!(dir.path().join("nested").join("swaps_0xabc.json").exists());
		assert!(!dir.path().join("nested").join("swaps_0xabc.tmp").exists());

		storage.delete("swaps:0xabc").await.unwrap();
		assert!(!storage.exists("swaps:0xabc").await.unwrap());
		assert!(matches!(
			storage.get_bytes("swaps:0xabc").await,
			Err(StorageError::NotFound)
		));
		storage.delete("swaps:0xabc").await.unwrap();
	}

	#[tokio::test]
	async fn test_entries_survive_new_instance() {
		let dir = TempDir::new().unwrap();
		FileStorage::new(dir.path().to_path_buf())
			.set_bytes("swaps:1", b"persisted".to_vec())
			.await
			.unwrap();

		let reopened = FileStorage::new(dir.path().to_path_buf());
		assert_eq!(reopened.get_bytes("swaps:1").await.unwrap(), b"persisted");
	}

	#[tokio::test]
	async fn test_factory_uses_storage_path() {
		let dir = TempDir::new().unwrap();
		let mut table = toml::map::Map::new();
		table.insert(
			"storage_path".to_string(),
			toml::Value::String(dir.path().to_string_lossy().into_owned()),
		);
		let storage = create_storage(&toml::Value::Table(table)).unwrap();
		storage.set_bytes("swaps:x", vec![1, 2, 3]).await.unwrap();
		assert!(dir.path().join("swaps_x.json").exists());
	}

	#[test]
	fn test_factory_rejects_empty_path() {
		let config: toml::Value = toml::from_str(r#"storage_path = """#).unwrap();
		assert!(matches!(
			create_storage(&config),
			Err(StorageError::Configuration(_))
		));
	}
}
