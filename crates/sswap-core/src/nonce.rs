//! Per-maker nonce watermarks.

use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Nonce {nonce} already used for {maker}: watermark is {current}")]
pub struct NonceError {
	pub maker: Address,
	pub nonce: U256,
	pub current: U256,
}

/// Highest accepted nonce per maker.
///
/// A nonce is accepted only if it is strictly greater than the maker's
/// watermark, so consuming nonce `n` also retires every nonce below it.
#[derive(Debug, Default, Clone)]
pub struct NonceRegistry {
	watermarks: HashMap<Address, U256>,
}

impl NonceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Last accepted nonce for `maker`, zero if none.
	pub fn peek(&self, maker: Address) -> U256 {
		self.watermarks.get(&maker).copied().unwrap_or_default()
	}

	/// Raises the watermark for `maker` to `nonce` and returns the previous value.
	pub fn consume(&mut self, maker: Address, nonce: U256) -> Result<U256, NonceError> {
		let current = self.peek(maker);
		if nonce <= current {
			return Err(NonceError {
				maker,
				nonce,
				current,
			});
		}
		self.watermarks.insert(maker, nonce);
		Ok(current)
	}

	/// Puts back a watermark returned by [`NonceRegistry::consume`].
	pub(crate) fn restore(&mut self, maker: Address, previous: U256) {
		if previous.is_zero() {
			self.watermarks.remove(&maker);
		} else {
			self.watermarks.insert(maker, previous);
		}
	}
}
