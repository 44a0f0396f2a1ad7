//! Order types for bilateral token swaps.
//!
//! An [`Order`] is a maker's signed offer to give `maker_token_amount` to a
//! named taker in exchange for `taker_token_amount`. Both types carry their
//! EIP-712 schema so off-chain signers and the engine hash them identically.

use crate::utils::{
	u256_serde, Eip712AbiEncoder, Eip712Field, Eip712Struct, Eip712Type,
};
use alloy_primitives::{Address, B256, U256};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// `TokenAmount(address token,uint256 amount)`
pub static TOKEN_AMOUNT_TYPE: Eip712Type = Eip712Type {
	name: "TokenAmount",
	fields: &[
		Eip712Field::new("token", "address"),
		Eip712Field::new("amount", "uint256"),
	],
	dependencies: &[],
};

/// `Order(TokenAmount takerTokenAmount,address taker,TokenAmount makerTokenAmount,address maker,uint256 nonce,uint256 deadline,uint256 chainId)`
/// followed by the `TokenAmount` definition.
pub static ORDER_TYPE: Eip712Type = Eip712Type {
	name: "Order",
	fields: &[
		Eip712Field::new("takerTokenAmount", "TokenAmount"),
		Eip712Field::new("taker", "address"),
		Eip712Field::new("makerTokenAmount", "TokenAmount"),
		Eip712Field::new("maker", "address"),
		Eip712Field::new("nonce", "uint256"),
		Eip712Field::new("deadline", "uint256"),
		Eip712Field::new("chainId", "uint256"),
	],
	dependencies: &[&TOKEN_AMOUNT_TYPE],
};

static TOKEN_AMOUNT_TYPE_HASH: Lazy<B256> = Lazy::new(|| TOKEN_AMOUNT_TYPE.type_hash());
static ORDER_TYPE_HASH: Lazy<B256> = Lazy::new(|| ORDER_TYPE.type_hash());

/// One leg of a trade: an amount of a specific token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
	/// Token contract address.
	pub token: Address,
	/// Amount in the token's smallest unit.
	#[serde(with = "u256_serde")]
	pub amount: U256,
}

impl TokenAmount {
	pub fn new(token: Address, amount: U256) -> Self {
		Self { token, amount }
	}
}

impl Eip712Struct for TokenAmount {
	fn eip712_type() -> &'static Eip712Type {
		&TOKEN_AMOUNT_TYPE
	}

	fn type_hash() -> B256 {
		*TOKEN_AMOUNT_TYPE_HASH
	}

	fn encode_data(&self, encoder: &mut Eip712AbiEncoder) {
		encoder.push_address(&self.token);
		encoder.push_u256(self.amount);
	}
}

/// A maker's offer to swap with one specific taker.
///
/// The order is valid strictly before `deadline` and only once: settling it
/// raises the maker's nonce watermark to `nonce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// What the taker pays to the maker.
	pub taker_token_amount: TokenAmount,
	/// The only identity allowed to submit this order.
	pub taker: Address,
	/// What the maker pays to the taker.
	pub maker_token_amount: TokenAmount,
	/// Signer of the order.
	pub maker: Address,
	#[serde(with = "u256_serde")]
	pub nonce: U256,
	/// UNIX timestamp (seconds); the order expires once the host clock reaches it.
	pub deadline: u64,
	pub chain_id: u64,
}

impl Eip712Struct for Order {
	fn eip712_type() -> &'static Eip712Type {
		&ORDER_TYPE
	}

	fn type_hash() -> B256 {
		*ORDER_TYPE_HASH
	}

	fn encode_data(&self, encoder: &mut Eip712AbiEncoder) {
		encoder.push_b256(&self.taker_token_amount.struct_hash());
		encoder.push_address(&self.taker);
		encoder.push_b256(&self.maker_token_amount.struct_hash());
		encoder.push_address(&self.maker);
		encoder.push_u256(self.nonce);
		encoder.push_u64(self.deadline);
		encoder.push_u64(self.chain_id);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256};

	fn reference_order() -> Order {
		let one = U256::from(10u64).pow(U256::from(18));
		Order {
			taker_token_amount: TokenAmount::new(
				address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
				one,
			),
			taker: address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
			maker_token_amount: TokenAmount::new(
				address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
				one,
			),
			maker: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
			nonce: U256::from(1),
			deadline: 16907348320,
			chain_id: 31337,
		}
	}

	#[test]
	fn test_type_strings() {
		assert_eq!(
			TOKEN_AMOUNT_TYPE.encode_type(),
			"TokenAmount(address token,uint256 amount)"
		);
		assert_eq!(
			ORDER_TYPE.encode_type(),
			"Order(TokenAmount takerTokenAmount,address taker,TokenAmount makerTokenAmount,address maker,uint256 nonce,uint256 deadline,uint256 chainId)TokenAmount(address token,uint256 amount)"
		);
	}

	#[test]
	fn test_type_hashes() {
		assert_eq!(
			TokenAmount::type_hash(),
			b256!("365a5df9ea67a8445aec5ebfdb93f4781cdafef3450a488895855b9dad9abc34")
		);
		assert_eq!(
			Order::type_hash(),
			b256!("dd713f336a16b6ef734bac7649a78b3777f60e20c62554606297aa7244557705")
		);
	}

	#[test]
	fn test_order_struct_hash_matches_reference() {
		assert_eq!(
			reference_order().struct_hash(),
			b256!("cb4310af266814d553a25ff440adaae0c76e6d4fade1ef1158155e24ec8f8a6c")
		);
	}

	#[test]
	fn test_struct_hash_changes_with_each_field() {
		let base = reference_order();
		let base_hash = base.struct_hash();

		let mut changed = base.clone();
		changed.nonce += U256::from(1);
		assert_ne!(changed.struct_hash(), base_hash);

		let mut changed = base.clone();
		changed.deadline += 1;
		assert_ne!(changed.struct_hash(), base_hash);

		let mut changed = base.clone();
		changed.chain_id = 1;
		assert_ne!(changed.struct_hash(), base_hash);

		let mut changed = base.clone();
		std::mem::swap(&mut changed.taker, &mut changed.maker);
		assert_ne!(changed.struct_hash(), base_hash);

		let mut changed = base;
		changed.maker_token_amount.amount = U256::from(2);
		assert_ne!(changed.struct_hash(), base_hash);
	}

	#[test]
	fn test_order_json_shape() {
		let json = serde_json::json!({
			"takerTokenAmount": {
				"token": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
				"amount": "1000000000000000000"
			},
			"taker": "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
			"makerTokenAmount": {
				"token": "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0",
				"amount": "0xde0b6b3a7640000"
			},
			"maker": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
			"nonce": 1,
			"deadline": 16907348320u64,
			"chainId": 31337
		});
		let order: Order = serde_json::from_value(json).unwrap();
		assert_eq!(order, reference_order());

		let encoded = serde_json::to_value(&order).unwrap();
		assert_eq!(encoded["nonce"], "1");
		assert_eq!(encoded["makerTokenAmount"]["amount"], "1000000000000000000");
	}
}
