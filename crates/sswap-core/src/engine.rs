//! The swap executor.
//!
//! [`SSwap`] settles one signed order per call. Checks run in a fixed order
//! (expiry, sender, signature, nonce) and the first failure ends the call
//! with no state change. Both transfers share one ledger checkpoint, so a
//! failing leg also undoes the other leg and the nonce consumption.

use crate::hasher::OrderHasher;
use crate::nonce::{NonceError, NonceRegistry};
use crate::verifier::{verify_signer, SignatureError};
use alloy_primitives::{Address, B256, U256};
use sswap_ledger::{LedgerError, TokenLedger};
use sswap_types::{truncate_hash, Eip712Domain, Order, SwapEvent};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Host-provided identity and clock for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
	/// Identity submitting the order.
	pub sender: Address,
	/// Current UNIX time in seconds.
	pub timestamp: u64,
}

impl CallContext {
	pub fn new(sender: Address, timestamp: u64) -> Self {
		Self { sender, timestamp }
	}
}

/// Reasons a swap is rejected. Every variant leaves engine state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
	/// The call happened at or after `order.deadline`.
	#[error("Order expired: deadline {deadline}, now {now}")]
	OrderExpired { deadline: u64, now: u64 },
	/// The caller is not the order's taker.
	#[error("Invalid sender: order is for {expected}, submitted by {actual}")]
	InvalidSender { expected: Address, actual: Address },
	#[error("Invalid signature: {0}")]
	InvalidSignature(#[from] SignatureError),
	/// The nonce is not above the maker's watermark.
	#[error("Nonce {nonce} already used for {maker}: watermark is {current}")]
	NonceUsed {
		maker: Address,
		nonce: U256,
		current: U256,
	},
	/// A ledger transfer failed; carries the ledger's error unchanged.
	#[error("Transfer failed: {0}")]
	Transfer(#[from] LedgerError),
}

impl SwapError {
	/// Stable name of the failure, used in API error bodies and logs.
	pub fn kind(&self) -> &'static str {
		match self {
			SwapError::OrderExpired { .. } => "OrderExpired",
			SwapError::InvalidSender { .. } => "InvalidSender",
			SwapError::InvalidSignature(_) => "InvalidSignature",
			SwapError::NonceUsed { .. } => "NonceUsed",
			SwapError::Transfer(_) => "TransferFailed",
		}
	}
}

impl From<NonceError> for SwapError {
	fn from(e: NonceError) -> Self {
		SwapError::NonceUsed {
			maker: e.maker,
			nonce: e.nonce,
			current: e.current,
		}
	}
}

/// Operations exposed by a swap engine.
pub trait SwapInterface {
	/// Domain separator, constant for the engine's lifetime.
	fn domain_separator(&self) -> B256;

	/// EIP-712 struct hash of `order`, independent of the domain.
	fn struct_hash(&self, order: &Order) -> B256;

	/// The digest a maker signs: `keccak256(0x1901 || domainSeparator || structHash)`.
	fn message_hash(&self, order: &Order) -> B256;

	/// Settles `order`, moving both legs through the ledger.
	fn swap(
		&mut self,
		ctx: &CallContext,
		order: &Order,
		signature: &[u8],
	) -> Result<SwapEvent, SwapError>;
}

/// Signature-authorized bilateral swap engine over a token ledger.
pub struct SSwap<L> {
	admin: Address,
	address: Address,
	hasher: OrderHasher,
	nonces: NonceRegistry,
	ledger: L,
}

impl<L: TokenLedger> SSwap<L> {
	/// `address` is the engine's own identity: the verifying contract of
	/// the signing domain and the spender the parties approve.
	pub fn new(admin: Address, address: Address, chain_id: u64, ledger: L) -> Self {
		Self {
			admin,
			address,
			hasher: OrderHasher::new(chain_id, address),
			nonces: NonceRegistry::new(),
			ledger,
		}
	}

	/// Administrative identity supplied at construction. No operation is
	/// gated on it.
	pub fn admin(&self) -> Address {
		self.admin
	}

	/// The engine's own address.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Signing domain fixed at construction.
	pub fn domain(&self) -> &Eip712Domain {
		self.hasher.domain()
	}

	/// Last accepted nonce for `maker`.
	pub fn nonce(&self, maker: Address) -> U256 {
		self.nonces.peek(maker)
	}

	/// Read access to the token ledger, e.g. for balance queries.
	pub fn ledger(&self) -> &L {
		&self.ledger
	}

	/// Mutable access to the token ledger for seeding balances and
	/// allowances outside of a swap.
	pub fn ledger_mut(&mut self) -> &mut L {
		&mut self.ledger
	}

	fn settle(
		&mut self,
		ctx: &CallContext,
		order: &Order,
		signature: &[u8],
	) -> Result<SwapEvent, SwapError> {
		if ctx.timestamp >= order.deadline {
			return Err(SwapError::OrderExpired {
				deadline: order.deadline,
				now: ctx.timestamp,
			});
		}
		if ctx.sender != order.taker {
			return Err(SwapError::InvalidSender {
				expected: order.taker,
				actual: ctx.sender,
			});
		}

		let order_hash = self.hasher.message_hash(order);
		verify_signer(&order_hash, signature, order.maker)?;

		let previous = self.nonces.consume(order.maker, order.nonce)?;

		let checkpoint = self.ledger.checkpoint();
		if let Err(e) = self.transfer_legs(order) {
			self.ledger.checkpoint_revert(checkpoint);
			self.nonces.restore(order.maker, previous);
			return Err(e.into());
		}
		self.ledger.checkpoint_commit();

		Ok(SwapEvent::settled(order_hash, order))
	}

	fn transfer_legs(&mut self, order: &Order) -> Result<(), LedgerError> {
		let taker_leg = &order.taker_token_amount;
		self.ledger.transfer_from(
			self.address,
			taker_leg.token,
			order.taker,
			order.maker,
			taker_leg.amount,
		)?;

		let maker_leg = &order.maker_token_amount;
		self.ledger.transfer_from(
			self.address,
			maker_leg.token,
			order.maker,
			order.taker,
			maker_leg.amount,
		)
	}
}

impl<L: TokenLedger> SwapInterface for SSwap<L> {
	fn domain_separator(&self) -> B256 {
		self.hasher.domain_separator()
	}

	fn struct_hash(&self, order: &Order) -> B256 {
		self.hasher.struct_hash(order)
	}

	fn message_hash(&self, order: &Order) -> B256 {
		self.hasher.message_hash(order)
	}

	#[instrument(skip_all, fields(maker = %order.maker, taker = %order.taker, nonce = %order.nonce))]
	fn swap(
		&mut self,
		ctx: &CallContext,
		order: &Order,
		signature: &[u8],
	) -> Result<SwapEvent, SwapError> {
		match self.settle(ctx, order, signature) {
			Ok(event) => {
				info!(order_hash = %truncate_hash(&event.order_hash), "Swap settled");
				Ok(event)
			},
			Err(e) => {
				warn!(kind = e.kind(), error = %e, "Swap rejected");
				Err(e)
			},
		}
	}
}
