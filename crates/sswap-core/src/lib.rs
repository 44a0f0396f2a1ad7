//! Settlement engine for signature-authorized bilateral token swaps.
//!
//! A maker signs an EIP-712 [`Order`](sswap_types::Order) off-chain naming a
//! single taker. The taker submits it to [`SSwap::swap`](engine::SwapInterface::swap),
//! which checks expiry, the submitting identity, the maker's signature and
//! the maker's nonce watermark, then moves both token legs atomically.

pub mod engine;
pub mod hasher;
pub mod nonce;
pub mod verifier;

pub use engine::{CallContext, SSwap, SwapError, SwapInterface};
pub use hasher::{OrderHasher, DOMAIN_NAME, DOMAIN_VERSION};
pub use nonce::{NonceError, NonceRegistry};
pub use verifier::{recover_signer, verify_signer, SignatureError};
