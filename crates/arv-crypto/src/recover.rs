//! # Recoverable signatures and signer verification
//!
//! The gateway signs the EIP-191 digest with a recoverable secp256k1
//! signature: 65 bytes of `r || s || v`. Recovery reconstructs the public
//! key from (digest, signature) and derives the signer address as the low
//! 20 bytes of `keccak256(uncompressed_pubkey)`.
//!
//! ## Security Invariant
//!
//! Pure verification: these functions take a digest and a signature and
//! return an address. No private key exists anywhere in this crate.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::{hex_to_bytes, normalize_hex, ExpectedSigner, GatewayAddress};
use crate::error::CryptoError;
use crate::keccak::{keccak256, SigningDigest};

/// A 65-byte recoverable secp256k1 signature: `r || s || v`.
///
/// Serializes as a `0x`-prefixed lowercase hex string. The recovery byte
/// `v` is stored as received; normalization to a recovery id happens at
/// recovery time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Parse a signature from hex.
    ///
    /// Accepts an optional `0x` prefix; an odd-length string is
    /// zero-padded on the left. Anything that does not decode to exactly
    /// 65 bytes is malformed.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let clean = normalize_hex(hex.trim());
        let bytes = hex_to_bytes(&clean).map_err(CryptoError::InvalidHex)?;
        if bytes.len() != 65 {
            return Err(CryptoError::MalformedSignature(format!(
                "expected 65-byte r||s||v signature, got {} bytes",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 65];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The 64-byte `r || s` component.
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    /// The recovery byte `v` as received.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Normalize `v` to a curve recovery id.
    ///
    /// Accepts the legacy 27/28 encoding, the raw 0..=3 form, and
    /// EIP-155-style values reduced mod 4.
    pub fn recovery_id(&self) -> Result<RecoveryId, CryptoError> {
        let v = self.v();
        let byte = match v {
            27 | 28 => v - 27,
            _ => v % 4,
        };
        RecoveryId::from_byte(byte)
            .ok_or_else(|| CryptoError::MalformedSignature(format!("bad recovery id byte {v}")))
    }

    /// Render the signature as `0x`-prefixed lowercase hex.
    pub fn to_prefixed_hex(&self) -> String {
        let hex: String = self.0.iter().map(|b| format!("{b:02x}")).collect();
        format!("0x{hex}")
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "RecoverableSignature({prefix}...)")
    }
}

/// Recover the signer address from a signature over a signing digest.
///
/// # Errors
///
/// Returns `CryptoError::MalformedSignature` when the `r || s` component
/// does not parse as a curve signature, the recovery id is invalid, or
/// public-key recovery fails.
pub fn recover_signer(
    digest: &SigningDigest,
    signature: &RecoverableSignature,
) -> Result<GatewayAddress, CryptoError> {
    let rec_id = signature.recovery_id()?;
    let sig = EcdsaSignature::from_slice(signature.rs())
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    let vk = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, rec_id)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    Ok(address_of(&vk))
}

/// Verify a signature against an expected signer.
///
/// - `Fixed`: the recovered address must equal the pinned one, byte for
///   byte (both sides are parsed bytes, so hex casing is irrelevant).
/// - `Any`: recovery success is sufficient; the recovered address is the
///   result. There is no identity to compare against, so only malformed
///   signatures can fail.
///
/// Returns the address to carry into public inputs as `gateway_address`.
pub fn verify_signer(
    digest: &SigningDigest,
    signature: &RecoverableSignature,
    expected: &ExpectedSigner,
) -> Result<GatewayAddress, CryptoError> {
    let recovered = recover_signer(digest, signature)?;
    match expected {
        ExpectedSigner::Fixed(addr) if *addr != recovered => Err(CryptoError::SignerMismatch {
            expected: *addr,
            recovered,
        }),
        _ => Ok(recovered),
    }
}

/// Ethereum-style address of a recovered public key: the low 20 bytes of
/// `keccak256` over the uncompressed point without its `0x04` tag.
fn address_of(vk: &VerifyingKey) -> GatewayAddress {
    let point = vk.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    GatewayAddress::from_bytes(addr)
}
