//! Builder for test configurations.

use crate::{ApiConfig, Config, EngineConfig, LedgerConfig, StorageConfig};
use alloy_primitives::{address, Address};
use std::collections::HashMap;

/// Builds a [`Config`] with an in-memory ledger and storage by default.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	address: Address,
	chain_id: u64,
	admin: Address,
	ledger_primary: String,
	ledger_config: toml::Value,
	storage_primary: String,
	storage_config: toml::Value,
	api: Option<ApiConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Hardhat defaults: the first deployment address, chain 31337 and
	/// account #0 as admin.
	pub fn new() -> Self {
		Self {
			address: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
			chain_id: 31337,
			admin: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
			ledger_primary: "memory".to_string(),
			ledger_config: toml::Value::Table(toml::Table::new()),
			storage_primary: "memory".to_string(),
			storage_config: toml::Value::Table(toml::Table::new()),
			api: None,
		}
	}

	/// Sets the engine address.
	pub fn address(mut self, address: Address) -> Self {
		self.address = address;
		self
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn admin(mut self, admin: Address) -> Self {
		self.admin = admin;
		self
	}

	/// Selects the primary ledger and its implementation table.
	pub fn ledger(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		self.ledger_primary = primary.into();
		self.ledger_config = config;
		self
	}

	/// Selects the primary storage and its implementation table.
	pub fn storage(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		self.storage_primary = primary.into();
		self.storage_config = config;
		self
	}

	pub fn api(mut self, api: Option<ApiConfig>) -> Self {
		self.api = api;
		self
	}

	/// Builds the configuration without validating it.
	pub fn build(self) -> Config {
		Config {
			engine: EngineConfig {
				address: self.address,
				chain_id: self.chain_id,
				admin: self.admin,
			},
			ledger: LedgerConfig {
				implementations: HashMap::from([(
					self.ledger_primary.clone(),
					self.ledger_config,
				)]),
				primary: self.ledger_primary,
			},
			storage: StorageConfig {
				implementations: HashMap::from([(
					self.storage_primary.clone(),
					self.storage_config,
				)]),
				primary: self.storage_primary,
			},
			api: self.api,
		}
	}
}
