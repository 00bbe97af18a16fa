//! # arv-crypto: signature-scheme primitives for the ARV stack
//!
//! Everything the pipeline needs to check the gateway's signature over a
//! receipt: Keccak-256 hashing, the EIP-191 personal-message signing
//! digest, the 65-byte recoverable secp256k1 signature, 20-byte gateway
//! addresses, and signer recovery/verification.
//!
//! ## Security Invariant
//!
//! - The signing digest can only be computed from `CanonicalBytes`, so the
//!   digest that is checked is always the digest the gateway signed.
//! - This crate is verification-only. It never holds, parses, or accepts
//!   a private key; the only key material it touches is the public key
//!   recovered from a signature.
//!
//! ## Crate Policy
//!
//! - Depends only on `arv-core` internally.
//! - No `unsafe` code, no `panic!()`/`.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod keccak;
pub mod recover;

pub use address::{ExpectedSigner, GatewayAddress, SignerMode};
pub use error::CryptoError;
pub use keccak::{keccak256, keccak256_digest, signing_digest, SigningDigest};
pub use recover::{recover_signer, verify_signer, RecoverableSignature};
