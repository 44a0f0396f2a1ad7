//! In-memory ERC-20 style ledger.
//!
//! Holds balances and allowances for any number of tokens in hash maps and
//! records every mutation in a journal so checkpoints can be rolled back.

use crate::{JournalCheckpoint, LedgerError, TokenLedger};
use alloy_primitives::{Address, U256};
use serde::Deserialize;
use sswap_types::{u256_serde, ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum JournalEntry {
	Balance {
		token: Address,
		owner: Address,
		previous: U256,
	},
	Allowance {
		token: Address,
		owner: Address,
		spender: Address,
		previous: U256,
	},
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
	balances: HashMap<(Address, Address), U256>,
	allowances: HashMap<(Address, Address, Address), U256>,
	journal: Vec<JournalEntry>,
	depth: usize,
}

impl MemoryLedger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Credits `amount` of `token` to `owner` out of thin air.
	pub fn mint(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), LedgerError> {
		let balance = self.balance_of(token, owner);
		let updated = balance
			.checked_add(amount)
			.ok_or(LedgerError::Overflow { token, owner })?;
		self.set_balance(token, owner, updated);
		Ok(())
	}

	/// Sets the amount of `token` that `spender` may move out of `owner`.
	pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
		self.set_allowance(token, owner, spender, amount);
	}

	fn set_balance(&mut self, token: Address, owner: Address, amount: U256) {
		let previous = self.balances.insert((token, owner), amount).unwrap_or_default();
		if self.depth > 0 {
			self.journal.push(JournalEntry::Balance {
				token,
				owner,
				previous,
			});
		}
	}

	fn set_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
		let previous = self
			.allowances
			.insert((token, owner, spender), amount)
			.unwrap_or_default();
		if self.depth > 0 {
			self.journal.push(JournalEntry::Allowance {
				token,
				owner,
				spender,
				previous,
			});
		}
	}
}

impl TokenLedger for MemoryLedger {
	fn balance_of(&self, token: Address, owner: Address) -> U256 {
		self.balances.get(&(token, owner)).copied().unwrap_or_default()
	}

	fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
		self.allowances
			.get(&(token, owner, spender))
			.copied()
			.unwrap_or_default()
	}

	fn transfer_from(
		&mut self,
		spender: Address,
		token: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		let allowance = self.allowance(token, from, spender);
		if allowance < amount {
			return Err(LedgerError::InsufficientAllowance {
				token,
				owner: from,
				spender,
				allowance,
				required: amount,
			});
		}

		let from_balance = self.balance_of(token, from);
		if from_balance < amount {
			return Err(LedgerError::InsufficientBalance {
				token,
				owner: from,
				balance: from_balance,
				required: amount,
			});
		}

		if from != to {
			let to_balance = self.balance_of(token, to);
			let credited = to_balance
				.checked_add(amount)
				.ok_or(LedgerError::Overflow { token, owner: to })?;
			self.set_balance(token, from, from_balance - amount);
			self.set_balance(token, to, credited);
		}
		if allowance != U256::MAX {
			self.set_allowance(token, from, spender, allowance - amount);
		}

		debug!(%token, %from, %to, %amount, "Transferred tokens");
		Ok(())
	}

	fn checkpoint(&mut self) -> JournalCheckpoint {
		self.depth += 1;
		JournalCheckpoint {
			journal_len: self.journal.len(),
			depth: self.depth,
		}
	}

	fn checkpoint_commit(&mut self) {
		self.depth = self.depth.saturating_sub(1);
		if self.depth == 0 {
			self.journal.clear();
		}
	}

	fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
		while self.journal.len() > checkpoint.journal_len {
			let Some(entry) = self.journal.pop() else {
				break;
			};
			match entry {
				JournalEntry::Balance {
					token,
					owner,
					previous,
				} => {
					self.balances.insert((token, owner), previous);
				},
				JournalEntry::Allowance {
					token,
					owner,
					spender,
					previous,
				} => {
					self.allowances.insert((token, owner, spender), previous);
				},
			}
		}
		self.depth = checkpoint.depth.saturating_sub(1);
		if self.depth == 0 {
			self.journal.clear();
		}
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryLedgerSchema)
	}
}

/// Configuration schema for [`MemoryLedger`] seed tables.
pub struct MemoryLedgerSchema;

impl ConfigSchema for MemoryLedgerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let balance = Schema::new(
			vec![
				Field::new("token", FieldType::Address),
				Field::new("owner", FieldType::Address),
				Field::new("amount", FieldType::Uint),
			],
			vec![],
		);
		let allowance = Schema::new(
			vec![
				Field::new("token", FieldType::Address),
				Field::new("owner", FieldType::Address),
				Field::new("amount", FieldType::Uint),
			],
			vec![Field::new("spender", FieldType::Address)],
		);
		Schema::new(
			vec![],
			vec![
				Field::new("balances", FieldType::Array(Box::new(FieldType::Table(balance)))),
				Field::new(
					"allowances",
					FieldType::Array(Box::new(FieldType::Table(allowance))),
				),
			],
		)
		.validate(config)
	}
}

#[derive(Debug, Deserialize)]
struct SeedBalance {
	token: Address,
	owner: Address,
	#[serde(with = "u256_serde")]
	amount: U256,
}

#[derive(Debug, Deserialize)]
struct SeedAllowance {
	token: Address,
	owner: Address,
	spender: Option<Address>,
	#[serde(with = "u256_serde")]
	amount: U256,
}

#[derive(Debug, Default, Deserialize)]
struct MemoryLedgerConfig {
	#[serde(default)]
	balances: Vec<SeedBalance>,
	#[serde(default)]
	allowances: Vec<SeedAllowance>,
}

/// Builds a memory ledger seeded from configuration.
///
/// ```toml
/// balances = [{ token = "0x..", owner = "0x..", amount = "1000" }]
/// allowances = [{ token = "0x..", owner = "0x..", amount = "1000" }]
/// ```
///
/// Allowances without a `spender` are granted to `engine`.
pub fn create_ledger(
	config: &toml::Value,
	engine: Address,
) -> Result<Box<dyn TokenLedger>, LedgerError> {
	MemoryLedgerSchema
		.validate(config)
		.map_err(|e| LedgerError::Configuration(e.to_string()))?;

	let seed: MemoryLedgerConfig = config
		.clone()
		.try_into()
		.map_err(|e: toml::de::Error| LedgerError::Configuration(e.to_string()))?;

	let mut ledger = MemoryLedger::new();
	for balance in seed.balances {
		ledger.mint(balance.token, balance.owner, balance.amount)?;
	}
	for allowance in seed.allowances {
		ledger.approve(
			allowance.token,
			allowance.owner,
			allowance.spender.unwrap_or(engine),
			allowance.amount,
		);
	}
	Ok(Box::new(ledger))
}

/// Registry entry for the memory ledger implementation.
pub struct Registry;

impl sswap_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::LedgerFactory;

	fn factory() -> Self::Factory {
		create_ledger
	}
}

impl crate::LedgerRegistry for Registry {}
