//! # Gateway addresses and the expected-signer boundary type
//!
//! A gateway address is the 20-byte Ethereum-style address derived from
//! the gateway's signing key. Addresses are parsed once into bytes, so
//! comparison is case-insensitive by construction and no hex-casing
//! convention leaks into the pipeline.
//!
//! `ExpectedSigner` encodes the two verification modes at the API
//! boundary: `Fixed(address)` pins the signer identity, `Any` (the CLI's
//! `auto` sentinel, decoded exactly once) accepts whichever address the
//! signature recovers to. `Any` downgrades the guarantee from "proves it
//! was X" to "proves some consistent signer signed it", so the mode is
//! carried into the public inputs where consumers can see it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// A 20-byte gateway signer address.
///
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GatewayAddress(pub [u8; 20]);

impl GatewayAddress {
    /// Create an address from raw 20 bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// The raw 20-byte address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse an address from hex.
    ///
    /// Accepts an optional `0x` prefix and either case; an odd-length
    /// string is zero-padded on the left. A 32-byte (left-padded) value
    /// is accepted by taking its low 20 bytes, matching how addresses
    /// travel inside 32-byte field elements.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let clean = normalize_hex(hex.trim());
        let bytes = hex_to_bytes(&clean).map_err(CryptoError::InvalidAddress)?;
        let slice: &[u8] = if bytes.len() == 32 { &bytes[12..] } else { &bytes };
        if slice.len() != 20 {
            return Err(CryptoError::InvalidAddress(format!(
                "address must be 20 bytes (or 32 left-padded), got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(slice);
        Ok(Self(arr))
    }

    /// Render the address as bare lowercase hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Render the address as `0x`-prefixed lowercase hex.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }
}

impl Serialize for GatewayAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for GatewayAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for GatewayAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayAddress({})", self.to_prefixed_hex())
    }
}

impl std::fmt::Display for GatewayAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_prefixed_hex())
    }
}

/// Which signer the verifier requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedSigner {
    /// The recovered address must equal this one.
    Fixed(GatewayAddress),
    /// Accept whichever address validly recovers (no identity pinning).
    Any,
}

impl ExpectedSigner {
    /// Decode the CLI-facing form: the literal `auto` (any case) means
    /// `Any`, everything else must parse as an address.
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Any)
        } else {
            Ok(Self::Fixed(GatewayAddress::from_hex(s)?))
        }
    }

    /// The verification mode tag carried into public inputs.
    pub fn mode(&self) -> SignerMode {
        match self {
            Self::Fixed(_) => SignerMode::Fixed,
            Self::Any => SignerMode::Auto,
        }
    }

    /// The pinned address, if this is fixed-mode verification.
    pub fn fixed_address(&self) -> Option<GatewayAddress> {
        match self {
            Self::Fixed(addr) => Some(*addr),
            Self::Any => None,
        }
    }
}

/// Output tag distinguishing pinned-signer verification from auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerMode {
    /// The signer identity was pinned to a known address.
    Fixed,
    /// Whatever address recovered was accepted.
    Auto,
}

impl SignerMode {
    /// The mode tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for SignerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip an optional `0x` prefix and zero-pad odd-length hex.
pub(crate) fn normalize_hex(s: &str) -> String {
    let clean = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if clean.len() % 2 == 0 {
        clean.to_string()
    } else {
        format!("0{clean}")
    }
}

pub(crate) fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}
