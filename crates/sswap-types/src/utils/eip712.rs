//! Generic EIP-712 utilities.
//!
//! These helpers provide:
//! - Canonical type encoding (`encodeType`) from a declarative type schema
//! - Struct hashing (`hashStruct`) for any type implementing [`Eip712Struct`]
//! - Domain separator computation
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - A minimal ABI encoder for the static field types used in struct hashing

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single member of an EIP-712 struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712Field {
	/// Member name as it appears in the type string.
	pub name: &'static str,
	/// Solidity type of the member, or the name of another struct type.
	pub ty: &'static str,
}

impl Eip712Field {
	pub const fn new(name: &'static str, ty: &'static str) -> Self {
		Self { name, ty }
	}
}

/// Declarative description of an EIP-712 struct type.
///
/// Members keep their declaration order. Struct-typed members must list the
/// referenced type in `dependencies` so that `encode_type` can append its
/// definition.
#[derive(Debug)]
pub struct Eip712Type {
	pub name: &'static str,
	pub fields: &'static [Eip712Field],
	pub dependencies: &'static [&'static Eip712Type],
}

impl Eip712Type {
	/// Renders the canonical type string.
	///
	/// The primary type comes first, followed by every transitively referenced
	/// struct type exactly once, sorted by name.
	pub fn encode_type(&self) -> String {
		let mut referenced = BTreeMap::new();
		self.collect_dependencies(&mut referenced);
		referenced.remove(self.name);

		let mut encoded = self.encode_members();
		for dependency in referenced.values() {
			encoded.push_str(&dependency.encode_members());
		}
		encoded
	}

	/// keccak256 of the canonical type string.
	pub fn type_hash(&self) -> B256 {
		keccak256(self.encode_type().as_bytes())
	}

	fn encode_members(&self) -> String {
		let members: Vec<String> = self
			.fields
			.iter()
			.map(|field| format!("{} {}", field.ty, field.name))
			.collect();
		format!("{}({})", self.name, members.join(","))
	}

	fn collect_dependencies(&self, found: &mut BTreeMap<&'static str, &'static Eip712Type>) {
		for dependency in self.dependencies {
			if found.insert(dependency.name, dependency).is_none() {
				dependency.collect_dependencies(found);
			}
		}
	}
}

/// A value that can be hashed as an EIP-712 struct.
pub trait Eip712Struct {
	/// The type schema this value is encoded with.
	fn eip712_type() -> &'static Eip712Type;

	/// Appends the encoded members, in declaration order, to `encoder`.
	///
	/// Nested structs are encoded as their own `struct_hash`.
	fn encode_data(&self, encoder: &mut Eip712AbiEncoder);

	/// Type hash of the schema. Implementors may override this to cache it.
	fn type_hash() -> B256 {
		Self::eip712_type().type_hash()
	}

	/// keccak256(typeHash || encodeData(self)).
	fn struct_hash(&self) -> B256 {
		let mut encoder = Eip712AbiEncoder::new();
		encoder.push_b256(&Self::type_hash());
		self.encode_data(&mut encoder);
		keccak256(encoder.finish())
	}
}

pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`
pub static DOMAIN_TYPE: Eip712Type = Eip712Type {
	name: DOMAIN_TYPE_NAME,
	fields: &[
		Eip712Field::new("name", "string"),
		Eip712Field::new("version", "string"),
		Eip712Field::new("chainId", "uint256"),
		Eip712Field::new("verifyingContract", "address"),
	],
	dependencies: &[],
};

/// Signing domain binding signatures to an application, chain and contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl Eip712Domain {
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		chain_id: u64,
		verifying_contract: Address,
	) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			chain_id,
			verifying_contract,
		}
	}

	/// The domain separator, i.e. the struct hash of the domain itself.
	pub fn separator(&self) -> B256 {
		self.struct_hash()
	}
}

impl Eip712Struct for Eip712Domain {
	fn eip712_type() -> &'static Eip712Type {
		&DOMAIN_TYPE
	}

	fn encode_data(&self, encoder: &mut Eip712AbiEncoder) {
		encoder.push_string(&self.name);
		encoder.push_string(&self.version);
		encoder.push_u64(self.chain_id);
		encoder.push_address(&self.verifying_contract);
	}
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
///
/// Every push appends exactly one 32-byte word.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u64(&mut self, v: u64) {
		let mut word = [0u8; 32];
		word[24..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
	}

	/// Dynamic `string` members are encoded as the keccak256 of their UTF-8 bytes.
	pub fn push_string(&mut self, v: &str) {
		self.push_b256(&keccak256(v.as_bytes()));
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256};

	static LEAF: Eip712Type = Eip712Type {
		name: "Leaf",
		fields: &[Eip712Field::new("value", "uint256")],
		dependencies: &[],
	};

	static BRANCH: Eip712Type = Eip712Type {
		name: "Branch",
		fields: &[
			Eip712Field::new("right", "Leaf"),
			Eip712Field::new("left", "Leaf"),
		],
		dependencies: &[&LEAF, &LEAF],
	};

	static ROOT: Eip712Type = Eip712Type {
		name: "Root",
		fields: &[
			Eip712Field::new("tree", "Branch"),
			Eip712Field::new("extra", "Leaf"),
		],
		dependencies: &[&LEAF, &BRANCH],
	};

	#[test]
	fn test_encode_type_without_dependencies() {
		assert_eq!(
			DOMAIN_TYPE.encode_type(),
			"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)"
		);
	}

	#[test]
	fn test_encode_type_sorts_and_deduplicates_dependencies() {
		assert_eq!(
			ROOT.encode_type(),
			"Root(Branch tree,Leaf extra)Branch(Leaf right,Leaf left)Leaf(uint256 value)"
		);
		assert_eq!(BRANCH.encode_type(), "Branch(Leaf right,Leaf left)Leaf(uint256 value)");
	}

	#[test]
	fn test_domain_type_hash() {
		assert_eq!(
			DOMAIN_TYPE.type_hash(),
			b256!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f")
		);
	}

	#[test]
	fn test_domain_separator_known_value() {
		let domain = Eip712Domain::new(
			"SSWAP",
			"0.1.0",
			31337,
			address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
		);
		assert_eq!(
			domain.separator(),
			b256!("e3aed6b844f12106bbf0a011cff592a9138f93e50e4807cdabfcdc8c087604bd")
		);
	}

	#[test]
	fn test_encoder_words() {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_u64(0x0102);
		enc.push_address(&address!("00000000000000000000000000000000000000ff"));
		let out = enc.finish();
		assert_eq!(out.len(), 64);
		assert_eq!(out[30], 0x01);
		assert_eq!(out[31], 0x02);
		assert!(out[..30].iter().all(|b| *b == 0));
		assert_eq!(out[63], 0xff);
		assert!(out[32..63].iter().all(|b| *b == 0));
	}

	#[test]
	fn test_final_digest_prefix() {
		let digest = compute_final_digest(&B256::ZERO, &B256::ZERO);
		let mut preimage = vec![0x19, 0x01];
		preimage.extend_from_slice(&[0u8; 64]);
		assert_eq!(digest, keccak256(preimage));
	}
}
