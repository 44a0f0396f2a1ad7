//! Settlement records emitted by the swap engine.

use crate::order::Order;
use crate::utils::u256_serde;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Record of one settled order.
///
/// Emitted exactly once per successful swap, after both transfers have
/// completed. `order_hash` is the domain-separated digest the maker signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
	pub order_hash: B256,
	pub maker: Address,
	pub taker: Address,
	/// The maker's new nonce watermark.
	#[serde(with = "u256_serde")]
	pub nonce: U256,
	/// Token the maker paid.
	pub maker_token: Address,
	#[serde(with = "u256_serde")]
	pub maker_amount: U256,
	/// Token the taker paid.
	pub taker_token: Address,
	#[serde(with = "u256_serde")]
	pub taker_amount: U256,
}

impl SwapEvent {
	/// Builds the record for `order` settled under `order_hash`.
	pub fn settled(order_hash: B256, order: &Order) -> Self {
		Self {
			order_hash,
			maker: order.maker,
			taker: order.taker,
			nonce: order.nonce,
			maker_token: order.maker_token_amount.token,
			maker_amount: order.maker_token_amount.amount,
			taker_token: order.taker_token_amount.token,
			taker_amount: order.taker_token_amount.amount,
		}
	}
}
