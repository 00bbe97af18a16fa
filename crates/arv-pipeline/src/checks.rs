//! # Check names and the consistency checker
//!
//! Every way a run can fail verification is a named check, and a failed
//! run carries the full list. The consistency checker compares the
//! receipt's embedded policy/consent commitments against the externally
//! supplied expected values; both comparisons always run, because an
//! auditor needs to see every divergence, not the first one.

use arv_core::Receipt;
use serde::{Deserialize, Serialize};

/// The checks a pipeline run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// The receipt could not be canonicalized. Fatal; nothing downstream
    /// is computable.
    Canonicalization,
    /// The signature triple is not well-formed or not recoverable.
    SignatureMalformed,
    /// Fixed-mode signer comparison failed.
    SignatureMismatch,
    /// The receipt's policy commitment differs from the expected value.
    PolicyHashMismatch,
    /// The receipt's consent commitment differs from the expected value.
    ConsentHashMismatch,
}

impl CheckKind {
    /// The check name as printed and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canonicalization => "canonicalization",
            Self::SignatureMalformed => "signature_malformed",
            Self::SignatureMismatch => "signature_mismatch",
            Self::PolicyHashMismatch => "policy_hash_mismatch",
            Self::ConsentHashMismatch => "consent_hash_mismatch",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check with its diagnostic detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Which check failed.
    pub kind: CheckKind,
    /// Human-readable detail: the diverging values or parse error.
    pub detail: String,
}

impl CheckFailure {
    /// Build a failure record.
    pub fn new(kind: CheckKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Compare the receipt's embedded commitments against expected values,
/// byte for byte.
///
/// Both checks run unconditionally and report independently; a missing
/// embedded field counts as a mismatch. Returns the (possibly empty)
/// list of failures.
pub fn check_commitments(
    receipt: &Receipt,
    expected_policy_hash: &str,
    expected_consent_hash: &str,
) -> Vec<CheckFailure> {
    let mut failures = Vec::new();

    match receipt.policy_hash() {
        Some(embedded) if embedded == expected_policy_hash => {}
        Some(embedded) => failures.push(CheckFailure::new(
            CheckKind::PolicyHashMismatch,
            format!("receipt states {embedded}, expected {expected_policy_hash}"),
        )),
        None => failures.push(CheckFailure::new(
            CheckKind::PolicyHashMismatch,
            format!("receipt has no policy_hash field, expected {expected_policy_hash}"),
        )),
    }

    match receipt.consent_hash() {
        Some(embedded) if embedded == expected_consent_hash => {}
        Some(embedded) => failures.push(CheckFailure::new(
            CheckKind::ConsentHashMismatch,
            format!("receipt states {embedded}, expected {expected_consent_hash}"),
        )),
        None => failures.push(CheckFailure::new(
            CheckKind::ConsentHashMismatch,
            format!("receipt has no consent_snapshot_hash field, expected {expected_consent_hash}"),
        )),
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> Receipt {
        Receipt::from_json_str(
            r#"{"receipt_id": "r1", "policy_hash": "0xAA", "consent_snapshot_hash": "0xBB"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_matching_commitments_pass() {
        assert!(check_commitments(&receipt(), "0xAA", "0xBB").is_empty());
    }

    #[test]
    fn test_policy_mismatch_reported_alone() {
        let failures = check_commitments(&receipt(), "0xCC", "0xBB");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, CheckKind::PolicyHashMismatch);
        assert!(failures[0].detail.contains("0xAA"));
        assert!(failures[0].detail.contains("0xCC"));
    }

    #[test]
    fn test_consent_mismatch_reported_alone() {
        let failures = check_commitments(&receipt(), "0xAA", "0xCC");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, CheckKind::ConsentHashMismatch);
    }

    #[test]
    fn test_both_mismatches_reported_no_short_circuit() {
        let failures = check_commitments(&receipt(), "0x11", "0x22");
        let kinds: Vec<CheckKind> = failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![CheckKind::PolicyHashMismatch, CheckKind::ConsentHashMismatch]
        );
    }

    #[test]
    fn test_comparison_is_byte_exact() {
        // Hex casing is part of the committed bytes; "0xaa" is not "0xAA".
        let failures = check_commitments(&receipt(), "0xaa", "0xBB");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, CheckKind::PolicyHashMismatch);
    }

    #[test]
    fn test_missing_fields_are_mismatches() {
        let bare = Receipt::from_json_str(r#"{"receipt_id": "r1"}"#).unwrap();
        let failures = check_commitments(&bare, "0xAA", "0xBB");
        assert_eq!(failures.len(), 2);
        assert!(failures[0].detail.contains("no policy_hash"));
        assert!(failures[1].detail.contains("no consent_snapshot_hash"));
    }

    #[test]
    fn test_check_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&CheckKind::PolicyHashMismatch).unwrap(),
            "\"policy_hash_mismatch\""
        );
        assert_eq!(CheckKind::SignatureMismatch.to_string(), "signature_mismatch");
    }
}
