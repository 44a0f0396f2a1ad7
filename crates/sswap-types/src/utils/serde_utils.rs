//! Serde adapters for 256-bit integers.
//!
//! Amounts and nonces are written as decimal strings so JSON clients never
//! lose precision. Input accepts decimal strings, 0x-prefixed hex strings,
//! and plain JSON integers.

/// Serde module for `U256` fields.
pub mod u256_serde {
	use crate::utils::formatting::parse_u256;
	use alloy_primitives::U256;
	use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Repr {
		Text(String),
		Number(u64),
	}

	/// Writes the value as a decimal string.
	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		value.to_string().serialize(serializer)
	}

	/// Accepts a decimal or 0x-hex string, or a JSON integer.
	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Repr::deserialize(deserializer)? {
			Repr::Text(s) => parse_u256(&s).map_err(D::Error::custom),
			Repr::Number(n) => Ok(U256::from(n)),
		}
	}
}
