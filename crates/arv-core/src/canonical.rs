//! # Canonical serialization: JCS-compatible byte production
//!
//! Defines `CanonicalBytes`, the sole construction path for the bytes that
//! are hashed and signed anywhere in the ARV stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` (or `from_value()`),
//! which rejects unstable value types before JCS serialization. Any
//! function that computes a receipt hash or a signing digest must accept
//! `&CanonicalBytes`, so hashing over non-canonical bytes is
//! unrepresentable in the type system.
//!
//! ## Cross-Implementation Compatibility
//!
//! The issuing gateway, this verifier, and any external prover must all
//! produce byte-identical serialization for the same logical receipt:
//!
//! 1. **Reject floats.** Floats have non-deterministic number-to-text
//!    edge cases; receipt amounts are strings or integers.
//! 2. **Sorted keys at every depth, compact separators.** Serialization
//!    uses `serde_jcs` for RFC 8785 (JSON Canonicalization Scheme)
//!    compliant output.
//! 3. **UTF-8 output, non-ASCII passes through unescaped.**

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS-compatible canonicalization.
///
/// # Invariants
///
/// - The only constructors are `new()` and `from_value()`.
/// - All numeric values are integers, never floats.
/// - Object keys are sorted at every nesting depth; no insignificant
///   whitespace appears in the output.
/// - The byte sequence is valid UTF-8 JSON.
///
/// These invariants are enforced by the constructors and cannot be
/// violated by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value
    /// contains float numbers, or `SerializationFailed` if JCS
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-built JSON value tree.
    ///
    /// This is the entry point used for receipts, which are held as
    /// `serde_json::Value` because their action payload is free-form.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        reject_unstable_values(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the canonical bytes as a UTF-8 JSON string.
    ///
    /// The constructors only ever store UTF-8, so this cannot fail.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively reject value types with unstable serialization.
///
/// Pure floats (numbers not representable as i64/u64) are the only JSON
/// value type without one fixed textual representation across the
/// implementations that hash receipts, so they are refused outright.
/// Everything else (`null`, booleans, strings, integers, arrays, objects)
/// passes through.
fn reject_unstable_values(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(arr) => arr.iter().try_for_each(reject_unstable_values),
        Value::Object(map) => map.values().try_for_each(reject_unstable_values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_receipt_fields_sorted() {
        let data = serde_json::json!({"tool_id": "payments.demo@1.0.0", "amount": 123, "receipt_id": "r1"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(
            cb.as_str(),
            r#"{"amount":123,"receipt_id":"r1","tool_id":"payments.demo@1.0.0"}"#
        );
    }

    #[test]
    fn test_nested_keys_sorted_at_every_depth() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "args": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_str(), r#"{"args":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_key_order_independence() {
        let a = serde_json::json!({"id": "r1", "amount": 5, "policy_hash": "0xAA"});
        let b: Value =
            serde_json::from_str(r#"{"policy_hash":"0xAA","amount":5,"id":"r1"}"#).unwrap();
        let ca = CanonicalBytes::from_value(a).unwrap();
        let cb = CanonicalBytes::from_value(b).unwrap();
        assert_eq!(ca, cb);
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"amount": 1.5});
        match CanonicalBytes::new(&data).unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.25}]}});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_integer_accepted() {
        let data = serde_json::json!({"amount": 42});
        let cb = CanonicalBytes::new(&data).expect("integers should be accepted");
        assert_eq!(cb.as_str(), r#"{"amount":42}"#);
    }

    #[test]
    fn test_null_and_bool_passthrough() {
        let data = serde_json::json!({"anchored": false, "note": null, "signed": true});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"anchored":false,"note":null,"signed":true}"#);
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
    }

    #[test]
    fn test_negative_and_large_integers() {
        let data = serde_json::json!({"delta": -42, "ts": 9999999999i64});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"delta":-42,"ts":9999999999}"#);
    }

    #[test]
    fn test_unicode_passthrough() {
        // JCS output is UTF-8 with non-ASCII unescaped.
        let data = serde_json::json!({"description": "caf\u{00e9}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().contains('\u{00e9}'));
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert!(cb.len() > 0);
    }
}
