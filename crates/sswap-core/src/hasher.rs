//! Domain-separated order hashing.

use alloy_primitives::{Address, B256};
use sswap_types::utils::compute_final_digest;
use sswap_types::{Eip712Domain, Eip712Struct, Order};

pub const DOMAIN_NAME: &str = "SSWAP";
pub const DOMAIN_VERSION: &str = "0.1.0";

/// Hashes orders under a fixed signing domain.
///
/// The domain separator is computed once at construction and never
/// re-derived, so a hasher built for one chain keeps producing digests for
/// that chain.
#[derive(Debug, Clone)]
pub struct OrderHasher {
	domain: Eip712Domain,
	separator: B256,
}

impl OrderHasher {
	pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
		let domain = Eip712Domain::new(DOMAIN_NAME, DOMAIN_VERSION, chain_id, verifying_contract);
		let separator = domain.separator();
		Self { domain, separator }
	}

	pub fn domain(&self) -> &Eip712Domain {
		&self.domain
	}

	pub fn domain_separator(&self) -> B256 {
		self.separator
	}

	/// Hash of the order fields alone, independent of the domain.
	pub fn struct_hash(&self, order: &Order) -> B256 {
		order.struct_hash()
	}

	/// The digest a maker signs: `keccak256(0x1901 || separator || structHash)`.
	pub fn message_hash(&self, order: &Order) -> B256 {
		compute_final_digest(&self.separator, &order.struct_hash())
	}
}
