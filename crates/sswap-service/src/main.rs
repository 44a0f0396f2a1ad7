//! SSWAP settlement service.
//!
//! Loads the engine identity and backends from a TOML file and serves the
//! swap API over HTTP.

use clap::Parser;
use sswap_config::Config;
use std::path::PathBuf;

mod apis;
mod factory_registry;
mod server;

/// Command-line arguments for the swap service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		address = %config.engine.address,
		chain_id = config.engine.chain_id,
		"Loaded configuration"
	);

	let state = factory_registry::build_state(&config)?;
	server::start_server(config.api(), state).await?;

	tracing::info!("Stopped swap service");
	Ok(())
}
