//! Token ledger capability for the swap engine.
//!
//! The engine never owns balances itself. It moves tokens through a
//! [`TokenLedger`], which models allowance-gated `transferFrom` semantics
//! of ERC-20 tokens and a journal that lets a group of transfers be undone
//! as a unit.

use alloy_primitives::{Address, U256};
use sswap_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

pub mod implementations {
	pub mod memory;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
	#[error(
		"Insufficient allowance: {spender} may move {allowance} of {token} from {owner}, needs {required}"
	)]
	InsufficientAllowance {
		token: Address,
		owner: Address,
		spender: Address,
		allowance: U256,
		required: U256,
	},
	#[error("Insufficient balance: {owner} holds {balance} of {token}, needs {required}")]
	InsufficientBalance {
		token: Address,
		owner: Address,
		balance: U256,
		required: U256,
	},
	#[error("Balance overflow for {owner} in {token}")]
	Overflow { token: Address, owner: Address },
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Position in the ledger journal returned by [`TokenLedger::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCheckpoint {
	pub journal_len: usize,
	pub depth: usize,
}

/// Balances, allowances and delegated transfers for any number of tokens.
pub trait TokenLedger: Send + Sync {
	fn balance_of(&self, token: Address, owner: Address) -> U256;

	fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

	/// Moves `amount` of `token` from `from` to `to` on behalf of `spender`.
	///
	/// Fails without side effects if the allowance or the balance is short.
	/// An allowance of `U256::MAX` is never decremented.
	fn transfer_from(
		&mut self,
		spender: Address,
		token: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError>;

	/// Opens a checkpoint. Every change after it can be undone with
	/// [`TokenLedger::checkpoint_revert`].
	fn checkpoint(&mut self) -> JournalCheckpoint;

	/// Keeps the changes made since the innermost open checkpoint.
	fn checkpoint_commit(&mut self);

	/// Undoes every change made since `checkpoint` and closes it.
	fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint);

	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

impl<T: TokenLedger + ?Sized> TokenLedger for Box<T> {
	fn balance_of(&self, token: Address, owner: Address) -> U256 {
		(**self).balance_of(token, owner)
	}

	fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
		(**self).allowance(token, owner, spender)
	}

	fn transfer_from(
		&mut self,
		spender: Address,
		token: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		(**self).transfer_from(spender, token, from, to, amount)
	}

	fn checkpoint(&mut self) -> JournalCheckpoint {
		(**self).checkpoint()
	}

	fn checkpoint_commit(&mut self) {
		(**self).checkpoint_commit()
	}

	fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
		(**self).checkpoint_revert(checkpoint)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		(**self).config_schema()
	}
}

/// Builds a ledger from its `[ledger.implementations.<name>]` table.
///
/// The second argument is the engine address, used as the spender for
/// seeded allowances that do not name one.
pub type LedgerFactory = fn(&toml::Value, Address) -> Result<Box<dyn TokenLedger>, LedgerError>;

pub trait LedgerRegistry: ImplementationRegistry<Factory = LedgerFactory> {}

/// All ledger implementations as `(name, factory)` pairs.
pub fn get_all_implementations() -> Vec<(&'static str, LedgerFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}
