//! # Keccak-256 and the EIP-191 signing digest
//!
//! The gateway signs receipts with an Ethereum-style signing library, so
//! the value it actually signs is not the canonical bytes themselves but
//! the EIP-191 personal-message construction over their Keccak-256 hash:
//!
//! ```text
//! signing_digest = keccak256("\x19Ethereum Signed Message:\n" + len + keccak256(canonical))
//! ```
//!
//! This module reproduces that construction exactly. The SHA-256 receipt
//! hash in `arv-core` serves a different role (audit identifier); the two
//! digests use different hash functions on purpose and `SigningDigest` is
//! a distinct type so they cannot be swapped by accident.

use arv_core::{CanonicalBytes, ContentDigest, DigestAlgorithm};
use tiny_keccak::{Hasher, Keccak};

/// The EIP-191 personal-message prefix, before the decimal byte length.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\u{19}Ethereum Signed Message:\n";

/// The 32-byte digest a recoverable signature is checked against.
///
/// Distinct from `ContentDigest`: a `SigningDigest` is signing-scheme
/// input, never an identifier, and is not serialized into artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningDigest([u8; 32]);

impl SigningDigest {
    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Keccak-256 over arbitrary bytes.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut k = Keccak::v256();
    let mut out = [0u8; 32];
    k.update(bytes);
    k.finalize(&mut out);
    out
}

/// Keccak-256 content digest of canonical bytes, with its algorithm tag.
pub fn keccak256_digest(data: &CanonicalBytes) -> ContentDigest {
    ContentDigest::new(DigestAlgorithm::Keccak256, keccak256(data.as_bytes()))
}

/// EIP-191 personal-message digest over a payload.
///
/// `keccak256(prefix + decimal_len(payload) + payload)`, matching what
/// `personal_sign` implementations feed to the curve.
fn personal_digest(payload: &[u8]) -> SigningDigest {
    let prefix = format!("{PERSONAL_MESSAGE_PREFIX}{}", payload.len());
    let mut k = Keccak::v256();
    let mut out = [0u8; 32];
    k.update(prefix.as_bytes());
    k.update(payload);
    k.finalize(&mut out);
    SigningDigest(out)
}

/// The digest the gateway signs for a receipt: the EIP-191 construction
/// over the Keccak-256 hash of the canonical bytes.
///
/// Accepting only `&CanonicalBytes` guarantees the digest is computed
/// over the same bytes the gateway serialized, with signature and anchor
/// already stripped.
pub fn signing_digest(data: &CanonicalBytes) -> SigningDigest {
    personal_digest(&keccak256(data.as_bytes()))
}
