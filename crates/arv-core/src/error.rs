//! # Error types for receipt canonicalization and decoding
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Cryptographic and consistency failures defined in the
//! higher crates wrap or sit beside these; nothing here is recovered
//! silently.

use thiserror::Error;

/// Error during canonical serialization of a receipt.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical receipt content.
    /// Amounts and timestamps must be strings or integers; float-to-text
    /// conversion is not stable across implementations.
    #[error("float values are not permitted in canonical receipts; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error while decoding a receipt from its JSON representation.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The receipt document is not a JSON object.
    #[error("receipt must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The receipt document failed to parse as JSON.
    #[error("receipt is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
