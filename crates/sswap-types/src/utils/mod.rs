//! Utility functions for hashing, formatting and serialization.

pub mod eip712;
pub mod formatting;
pub mod helpers;
pub mod serde_utils;

pub use eip712::{
	compute_final_digest, Eip712AbiEncoder, Eip712Domain, Eip712Field, Eip712Struct, Eip712Type,
	DOMAIN_TYPE,
};
pub use formatting::{parse_address, parse_u256, truncate_hash, without_0x_prefix};
pub use helpers::current_timestamp;
pub use serde_utils::u256_serde;
