//! # The action receipt data model
//!
//! A receipt is the signed record of a governed tool call, issued by the
//! gateway. Its action payload is free-form (tool id, arguments,
//! timestamps, result summary), so the receipt is held as a JSON object
//! rather than a closed struct; the well-known fields the pipeline needs
//! are exposed through typed accessors.
//!
//! ## Signed-Content Invariant
//!
//! `receipt_sig` and `anchor` are metadata about the receipt, not part of
//! its signed content. [`Receipt::signing_base()`] is the single place
//! where they are stripped; every hash and signature in the stack is
//! computed over `canonical()`, which serializes the stripped base. A
//! receipt is immutable once issued except for the later addition of
//! `anchor` by the gateway, so stripping both fields keeps the signed
//! bytes stable across the receipt's whole lifecycle.

use serde_json::Value;

use crate::canonical::CanonicalBytes;
use crate::error::{CanonicalizationError, ReceiptError};

/// Top-level field holding the gateway signature. Never hashed or signed.
pub const SIGNATURE_FIELD: &str = "receipt_sig";

/// Top-level field added by on-chain anchoring. Never hashed or signed.
pub const ANCHOR_FIELD: &str = "anchor";

/// Embedded commitment to the policy the tool call ran under.
pub const POLICY_HASH_FIELD: &str = "policy_hash";

/// Embedded commitment to the consent snapshot the tool call ran under.
pub const CONSENT_HASH_FIELD: &str = "consent_snapshot_hash";

/// The receipt's unique identifier field.
pub const RECEIPT_ID_FIELD: &str = "receipt_id";

/// A signed record of a governed tool invocation.
///
/// Read-only input to the verification pipeline: the gateway creates
/// receipts, this crate only decodes and canonicalizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    value: Value,
}

impl Receipt {
    /// Wrap a parsed JSON value as a receipt.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError::NotAnObject` if the value is not a JSON
    /// object; a receipt is always a mapping at the top level.
    pub fn from_value(value: Value) -> Result<Self, ReceiptError> {
        if !value.is_object() {
            return Err(ReceiptError::NotAnObject(json_type_name(&value)));
        }
        Ok(Self { value })
    }

    /// Parse a receipt from a JSON document.
    pub fn from_json_str(data: &str) -> Result<Self, ReceiptError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }

    /// Parse a receipt from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, ReceiptError> {
        let value: Value = serde_json::from_slice(data)?;
        Self::from_value(value)
    }

    /// The full receipt document, including signature and anchor.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// The receipt's unique identifier, if present.
    pub fn receipt_id(&self) -> Option<&str> {
        self.value.get(RECEIPT_ID_FIELD).and_then(Value::as_str)
    }

    /// The embedded policy hash commitment, if present.
    pub fn policy_hash(&self) -> Option<&str> {
        self.value.get(POLICY_HASH_FIELD).and_then(Value::as_str)
    }

    /// The embedded consent snapshot hash commitment, if present.
    pub fn consent_hash(&self) -> Option<&str> {
        self.value.get(CONSENT_HASH_FIELD).and_then(Value::as_str)
    }

    /// The gateway signature stored on the receipt, if present.
    pub fn receipt_sig(&self) -> Option<&str> {
        self.value.get(SIGNATURE_FIELD).and_then(Value::as_str)
    }

    /// The anchor block added after on-chain anchoring, if present.
    pub fn anchor(&self) -> Option<&Value> {
        self.value.get(ANCHOR_FIELD)
    }

    /// The L2 transaction hash inside the anchor block, if present.
    pub fn anchor_tx_hash(&self) -> Option<&str> {
        self.value
            .get(ANCHOR_FIELD)
            .and_then(|a| a.get("l2_tx"))
            .and_then(|l| l.get("tx_hash"))
            .and_then(Value::as_str)
    }

    /// The receipt content covered by the gateway signature: the full
    /// document with the top-level `receipt_sig` and `anchor` fields
    /// removed.
    ///
    /// Removal happens before serialization, so the signature and anchor
    /// can never influence the byte layout of the signed content.
    pub fn signing_base(&self) -> Value {
        let mut base = self.value.clone();
        if let Some(obj) = base.as_object_mut() {
            obj.remove(SIGNATURE_FIELD);
            obj.remove(ANCHOR_FIELD);
        }
        base
    }

    /// Canonical bytes of the signed content.
    ///
    /// This is the single serialization every component that hashes or
    /// signs a receipt must route through.
    pub fn canonical(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::from_value(self.signing_base())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Receipt {
        Receipt::from_json_str(
            r#"{
                "receipt_id": "r1",
                "tool_id": "payments.demo@1.0.0",
                "args": {"amount": 123, "description": "test"},
                "policy_hash": "0xAA",
                "consent_snapshot_hash": "0xBB",
                "receipt_sig": "0xdeadbeef",
                "anchor": {"l2_tx": {"tx_hash": "0xfeed", "chain_id": 8453}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let r = sample();
        assert_eq!(r.receipt_id(), Some("r1"));
        assert_eq!(r.policy_hash(), Some("0xAA"));
        assert_eq!(r.consent_hash(), Some("0xBB"));
        assert_eq!(r.receipt_sig(), Some("0xdeadbeef"));
        assert_eq!(r.anchor_tx_hash(), Some("0xfeed"));
        assert!(r.anchor().is_some());
    }

    #[test]
    fn test_missing_fields_are_none() {
        let r = Receipt::from_json_str(r#"{"receipt_id": "r2"}"#).unwrap();
        assert_eq!(r.policy_hash(), None);
        assert_eq!(r.consent_hash(), None);
        assert_eq!(r.receipt_sig(), None);
        assert_eq!(r.anchor_tx_hash(), None);
    }

    #[test]
    fn test_signing_base_strips_signature_and_anchor() {
        let base = sample().signing_base();
        let obj = base.as_object().unwrap();
        assert!(!obj.contains_key(SIGNATURE_FIELD));
        assert!(!obj.contains_key(ANCHOR_FIELD));
        assert!(obj.contains_key("tool_id"));
        assert!(obj.contains_key(POLICY_HASH_FIELD));
    }

    #[test]
    fn test_canonical_excludes_signature_and_anchor() {
        // A receipt with and without signature/anchor canonicalizes to
        // the same bytes.
        let with = sample();
        let without = Receipt::from_json_str(
            r#"{
                "receipt_id": "r1",
                "tool_id": "payments.demo@1.0.0",
                "args": {"amount": 123, "description": "test"},
                "policy_hash": "0xAA",
                "consent_snapshot_hash": "0xBB"
            }"#,
        )
        .unwrap();
        assert_eq!(with.canonical().unwrap(), without.canonical().unwrap());
    }

    #[test]
    fn test_canonical_key_order_independent() {
        let a = Receipt::from_json_str(r#"{"b": 2, "a": 1, "receipt_id": "x"}"#).unwrap();
        let b = Receipt::from_json_str(r#"{"receipt_id": "x", "a": 1, "b": 2}"#).unwrap();
        assert_eq!(a.canonical().unwrap(), b.canonical().unwrap());
    }

    #[test]
    fn test_non_object_rejected() {
        match Receipt::from_value(serde_json::json!([1, 2, 3])).unwrap_err() {
            ReceiptError::NotAnObject(t) => assert_eq!(t, "array"),
            other => panic!("expected NotAnObject, got: {other}"),
        }
        assert!(Receipt::from_json_str("42").is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Receipt::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_float_in_payload_fails_canonicalization() {
        let r = Receipt::from_json_str(r#"{"receipt_id": "r3", "amount": 1.25}"#).unwrap();
        assert!(r.canonical().is_err());
    }
}
