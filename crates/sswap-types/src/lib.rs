//! Shared types for the SSWAP bilateral swap engine.
//!
//! Holds the order data model and its EIP-712 schemas, settlement records,
//! HTTP API types, storage namespaces, and the configuration validation
//! framework used by pluggable backends.

/// HTTP API request/response types and errors.
pub mod api;
/// Settlement records.
pub mod events;
/// Orders and token amounts.
pub mod order;
pub mod registry;
/// Storage namespaces.
pub mod storage;
/// EIP-712 hashing, parsing and serde helpers.
pub mod utils;
/// Configuration validation.
pub mod validation;

pub use api::*;
pub use events::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
pub use utils::{
	current_timestamp, parse_address, parse_u256, truncate_hash, u256_serde, without_0x_prefix,
	Eip712Domain, Eip712Struct,
};
pub use validation::*;
