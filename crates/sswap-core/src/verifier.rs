//! secp256k1 signer recovery for order signatures.
//!
//! Only the 65-byte `r || s || v` layout with `v` in {27, 28} is accepted.
//! Upper-half `s` values are rejected so that each order has exactly one
//! valid signature encoding per signer.

use alloy_primitives::{uint, Address, PrimitiveSignature, B256, U256};
use thiserror::Error;

/// `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1n / 2
pub const SECP256K1N_HALF: U256 =
	uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
	#[error("Invalid signature length: expected 65 bytes, got {0}")]
	InvalidLength(usize),
	#[error("Invalid recovery id {0}: expected 27 or 28")]
	InvalidRecoveryId(u8),
	#[error("Signature component is zero")]
	ZeroComponent,
	#[error("Signature s value is in the upper half of the curve order")]
	HighS,
	#[error("Public key recovery failed: {0}")]
	RecoveryFailed(String),
	#[error("Recovered the zero address")]
	ZeroAddress,
	#[error("Signer mismatch: expected {expected}, recovered {recovered}")]
	SignerMismatch { expected: Address, recovered: Address },
}

/// Recovers the address that produced `signature` over `hash`.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> Result<Address, SignatureError> {
	if signature.len() != SIGNATURE_LENGTH {
		return Err(SignatureError::InvalidLength(signature.len()));
	}

	let r = U256::from_be_slice(&signature[..32]);
	let s = U256::from_be_slice(&signature[32..64]);
	let y_parity = match signature[64] {
		27 => false,
		28 => true,
		v => return Err(SignatureError::InvalidRecoveryId(v)),
	};

	if r.is_zero() || s.is_zero() {
		return Err(SignatureError::ZeroComponent);
	}
	if s > SECP256K1N_HALF {
		return Err(SignatureError::HighS);
	}

	let signer = PrimitiveSignature::new(r, s, y_parity)
		.recover_address_from_prehash(hash)
		.map_err(|e| SignatureError::RecoveryFailed(e.to_string()))?;

	if signer == Address::ZERO {
		return Err(SignatureError::ZeroAddress);
	}
	Ok(signer)
}

/// Recovers the signer and checks it is `expected`.
pub fn verify_signer(
	hash: &B256,
	signature: &[u8],
	expected: Address,
) -> Result<Address, SignatureError> {
	let recovered = recover_signer(hash, signature)?;
	if recovered != expected {
		return Err(SignatureError::SignerMismatch {
			expected,
			recovered,
		});
	}
	Ok(recovered)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{maker_signer, sign, taker_signer, MAKER, TAKER};
	use alloy_primitives::keccak256;

	/// secp256k1 group order.
	const SECP256K1N: U256 =
		uint!(0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141_U256);

	#[test]
	fn test_recovers_signer() {
		let hash = keccak256(b"order");
		let signature = sign(&maker_signer(), &hash);
		assert_eq!(recover_signer(&hash, &signature).unwrap(), MAKER);
		assert_eq!(verify_signer(&hash, &signature, MAKER).unwrap(), MAKER);
	}

	#[test]
	fn test_signer_mismatch() {
		let hash = keccak256(b"order");
		let signature = sign(&taker_signer(), &hash);
		assert_eq!(
			verify_signer(&hash, &signature, MAKER),
			Err(SignatureError::SignerMismatch {
				expected: MAKER,
				recovered: TAKER,
			})
		);
	}

	#[test]
	fn test_different_hash_recovers_different_address() {
		let signature = sign(&maker_signer(), &keccak256(b"order"));
		match recover_signer(&keccak256(b"other"), &signature) {
			Ok(address) => assert_ne!(address, MAKER),
			Err(e) => assert!(matches!(e, SignatureError::RecoveryFailed(_))),
		}
	}

	#[test]
	fn test_rejects_wrong_length() {
		let hash = keccak256(b"order");
		let signature = sign(&maker_signer(), &hash);
		assert_eq!(
			recover_signer(&hash, &signature[..64]),
			Err(SignatureError::InvalidLength(64))
		);
		let mut long = signature.clone();
		long.push(0);
		assert_eq!(
			recover_signer(&hash, &long),
			Err(SignatureError::InvalidLength(66))
		);
		assert_eq!(recover_signer(&hash, &[]), Err(SignatureError::InvalidLength(0)));
	}

	#[test]
	fn test_rejects_bad_recovery_id() {
		let hash = keccak256(b"order");
		let mut signature = sign(&maker_signer(), &hash);
		for v in [0u8, 1, 26, 29, 255] {
			signature[64] = v;
			assert_eq!(
				recover_signer(&hash, &signature),
				Err(SignatureError::InvalidRecoveryId(v))
			);
		}
	}

	#[test]
	fn test_rejects_zero_components() {
		let hash = keccak256(b"order");
		let signature = sign(&maker_signer(), &hash);

		let mut zero_r = signature.clone();
		zero_r[..32].fill(0);
		assert_eq!(recover_signer(&hash, &zero_r), Err(SignatureError::ZeroComponent));

		let mut zero_s = signature;
		zero_s[32..64].fill(0);
		assert_eq!(recover_signer(&hash, &zero_s), Err(SignatureError::ZeroComponent));
	}

	#[test]
	fn test_rejects_malleated_high_s() {
		let hash = keccak256(b"order");
		let signature = sign(&maker_signer(), &hash);

		let s = U256::from_be_slice(&signature[32..64]);
		let mut malleated = signature.clone();
		malleated[32..64].copy_from_slice(&(SECP256K1N - s).to_be_bytes::<32>());
		malleated[64] = if signature[64] == 27 { 28 } else { 27 };

		assert_eq!(recover_signer(&hash, &malleated), Err(SignatureError::HighS));
	}
}
