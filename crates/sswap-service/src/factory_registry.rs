//! Builds the engine and its backends from configuration.

use crate::server::AppState;
use sswap_config::Config;
use sswap_core::SSwap;
use sswap_ledger::{LedgerError, LedgerFactory};
use sswap_storage::{StorageError, StorageFactory, StorageService};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while wiring backends from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
	/// No factory is registered under the configured name.
	#[error("Unknown {section} implementation '{name}'")]
	UnknownImplementation { section: &'static str, name: String },
	/// The primary has no `implementations` table.
	#[error("Missing configuration for {section} implementation '{name}'")]
	MissingConfig { section: &'static str, name: String },
	#[error("Ledger error: {0}")]
	Ledger(#[from] LedgerError),
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Available backend factories, keyed by configuration name.
pub struct FactoryRegistry {
	/// Ledger factories from `sswap_ledger::get_all_implementations`.
	pub ledger: HashMap<String, LedgerFactory>,
	/// Storage factories from `sswap_storage::get_all_implementations`.
	pub storage: HashMap<String, StorageFactory>,
}

impl FactoryRegistry {
	/// Collects every compiled-in implementation.
	pub fn new() -> Self {
		Self {
			ledger: sswap_ledger::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
			storage: sswap_storage::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}
}

fn select<'a, F>(
	section: &'static str,
	primary: &str,
	factories: &'a HashMap<String, F>,
	implementations: &'a HashMap<String, toml::Value>,
) -> Result<(&'a F, &'a toml::Value), BuildError> {
	let factory = factories
		.get(primary)
		.ok_or_else(|| BuildError::UnknownImplementation {
			section,
			name: primary.to_string(),
		})?;
	let config = implementations
		.get(primary)
		.ok_or_else(|| BuildError::MissingConfig {
			section,
			name: primary.to_string(),
		})?;
	Ok((factory, config))
}

/// Instantiates the primary ledger and storage and wraps them with the engine.
pub fn build_state(config: &Config) -> Result<AppState, BuildError> {
	let registry = FactoryRegistry::new();

	let (ledger_factory, ledger_config) = select(
		"ledger",
		&config.ledger.primary,
		&registry.ledger,
		&config.ledger.implementations,
	)?;
	let ledger = ledger_factory(ledger_config, config.engine.address)?;

	let (storage_factory, storage_config) = select(
		"storage",
		&config.storage.primary,
		&registry.storage,
		&config.storage.implementations,
	)?;
	let storage = storage_factory(storage_config)?;

	tracing::info!(
		ledger = %config.ledger.primary,
		storage = %config.storage.primary,
		"Initialized backends"
	);

	let engine = SSwap::new(
		config.engine.admin,
		config.engine.address,
		config.engine.chain_id,
		ledger,
	);
	Ok(AppState::new(engine, StorageService::new(storage)))
}
