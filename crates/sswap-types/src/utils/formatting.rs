//! String formatting and parsing helpers.
//!
//! Provides hex prefix handling, short display forms for hashes used in log
//! lines, and lenient parsing of addresses and 256-bit integers from
//! configuration and request strings.

use alloy_primitives::{Address, B256, U256};

/// Shortens a hash for log output: `0x1234abcd..`.
pub fn truncate_hash(hash: &B256) -> String {
	let full = format!("{:#x}", hash);
	format!("{}..", &full[..10])
}

/// Removes "0x" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Parses a 20-byte address from a hex string, with or without "0x" prefix.
///
/// Mixed-case input is accepted without checksum enforcement.
pub fn parse_address(value: &str) -> Result<Address, String> {
	let trimmed = without_0x_prefix(value.trim());
	if trimmed.len() != 40 {
		return Err(format!(
			"Invalid address '{}': expected 40 hex characters, got {}",
			value,
			trimmed.len()
		));
	}
	let mut bytes = [0u8; 20];
	hex::decode_to_slice(trimmed, &mut bytes)
		.map_err(|e| format!("Invalid address '{}': {}", value, e))?;
	Ok(Address::from(bytes))
}

/// Parses a 256-bit unsigned integer from a decimal or 0x-prefixed hex string.
pub fn parse_u256(value: &str) -> Result<U256, String> {
	let trimmed = value.trim();
	let parsed = match trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
	{
		Some(digits) => U256::from_str_radix(digits, 16),
		None => U256::from_str_radix(trimmed, 10),
	};
	if without_0x_prefix(trimmed).is_empty() {
		return Err(format!("Invalid uint256 '{}': no digits", value));
	}
	parsed.map_err(|e| format!("Invalid uint256 '{}': {}", value, e))
}
