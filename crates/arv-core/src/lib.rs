//! # arv-core: foundational types for the ARV stack
//!
//! Defines the primitives every other crate in the workspace builds on:
//! canonical receipt serialization, content digests, and the action
//! receipt data model. This crate depends on nothing internal; it is the
//! leaf of the workspace DAG.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests,
//!    ever. Two independent implementations (gateway, verifier, prover)
//!    must hash byte-identical input, and the private inner buffer makes
//!    any other serialization path unrepresentable.
//!
//! 2. **Signed content is stripped once.** `Receipt::signing_base()` is
//!    the single place where `receipt_sig` and `anchor` are removed from
//!    the bytes that get hashed and signed.
//!
//! 3. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `arv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod receipt;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, ReceiptError};
pub use receipt::Receipt;
