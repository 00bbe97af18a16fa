//! # Error types for signature recovery and signer checks

use thiserror::Error;

use crate::address::GatewayAddress;

/// Error in signature parsing, recovery, or signer comparison.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Hex input could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The signature triple is not well-formed or not recoverable.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Fixed-mode verification: the recovered signer is not the expected one.
    #[error("signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        /// The address the caller pinned.
        expected: GatewayAddress,
        /// The address the signature actually recovered to.
        recovered: GatewayAddress,
    },

    /// A gateway address could not be parsed.
    #[error("invalid gateway address: {0}")]
    InvalidAddress(String),
}
