//! Configuration for the SSWAP service.
//!
//! Configuration is TOML. String values may reference environment variables
//! as `${VAR}` or `${VAR:-default}`, and a file may pull in others with
//! `include = ["ledger.toml", ...]` as long as every top-level section is
//! defined in exactly one file.

mod loader;

#[cfg(any(test, feature = "testing"))]
pub mod builders {
	pub mod config;
}

use alloy_primitives::Address;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Reading a configuration file failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// The TOML could not be parsed into [`Config`].
	#[error("Configuration error: {0}")]
	Parse(String),
	/// The configuration parsed but violates a constraint.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration for the swap service.
///
/// Every section except `api` is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Engine identity and signing domain.
	pub engine: EngineConfig,
	/// Token ledger backend selection.
	pub ledger: LedgerConfig,
	/// Receipt storage backend selection.
	pub storage: StorageConfig,
	/// HTTP server settings; defaults apply when the section is absent.
	pub api: Option<ApiConfig>,
}

/// Identity of the engine instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
	/// The engine's own address: verifying contract of the signing domain
	/// and the spender that parties approve.
	pub address: Address,
	/// Chain id captured into the signing domain.
	pub chain_id: u64,
	/// Administrative identity; opaque to the engine.
	pub admin: Address,
}

/// Ledger section: which implementation to run and its settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
	/// Name of the implementation to use; must have a table below.
	pub primary: String,
	/// Raw per-implementation tables, validated by each implementation.
	pub implementations: HashMap<String, toml::Value>,
}

/// Storage section, shaped like [`LedgerConfig`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	pub primary: String,
	pub implementations: HashMap<String, toml::Value>,
}

/// HTTP API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Bind address (default 127.0.0.1).
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Listen port (default 3000).
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// CORS policy; permissive when absent.
	pub cors: Option<CorsConfig>,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			cors: None,
		}
	}
}

/// CORS settings for the API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
	/// Allowed origins; `"*"` allows any origin.
	pub allowed_origins: Vec<String>,
	#[serde(default)]
	pub allowed_headers: Vec<String>,
	#[serde(default)]
	pub allowed_methods: Vec<String>,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

/// Substitutes `${VAR}` and `${VAR:-default}` references.
///
/// Input is capped at 1 MiB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut resolved = String::with_capacity(input.len());
	let mut last = 0;
	for cap in re.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match (std::env::var(name.as_str()), cap.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					name.as_str()
				)));
			},
		};
		resolved.push_str(&input[last..whole.start()]);
		resolved.push_str(&value);
		last = whole.end();
	}
	resolved.push_str(&input[last..]);

	Ok(resolved)
}

impl Config {
	/// Loads a configuration file together with its includes.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;

		let mut loader = loader::ConfigLoader::new(base_dir);
		loader.load_config(file_name).await
	}

	/// API settings, falling back to defaults.
	pub fn api(&self) -> ApiConfig {
		self.api.clone().unwrap_or_default()
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.engine.chain_id == 0 {
			return Err(ConfigError::Validation(
				"engine.chain_id must be greater than 0".into(),
			));
		}
		if self.engine.address == Address::ZERO {
			return Err(ConfigError::Validation(
				"engine.address cannot be the zero address".into(),
			));
		}

		validate_primary("ledger", &self.ledger.primary, &self.ledger.implementations)?;
		validate_primary(
			"storage",
			&self.storage.primary,
			&self.storage.implementations,
		)?;

		if let Some(api) = &self.api {
			if api.port == 0 {
				return Err(ConfigError::Validation("api.port cannot be 0".into()));
			}
		}

		Ok(())
	}
}

fn validate_primary(
	section: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
) -> Result<(), ConfigError> {
	if implementations.is_empty() {
		return Err(ConfigError::Validation(format!(
			"At least one {} implementation must be configured",
			section
		)));
	}
	if primary.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{}.primary cannot be empty",
			section
		)));
	}
	if !implementations.contains_key(primary) {
		return Err(ConfigError::Validation(format!(
			"Primary {} '{}' not found in implementations",
			section, primary
		)));
	}
	Ok(())
}

/// Parses, resolves environment references and validates.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
