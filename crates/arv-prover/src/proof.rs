//! # The proof artifact
//!
//! A `Proof` is the opaque object a downstream consumer checks against
//! the public inputs. Its `scheme` tag is the trust statement: a
//! `receipt_sig` proof is a packaging of this pipeline's own signature
//! check, while any other scheme came from an external prover. The
//! `fallback` flag is true whenever no real external proof was produced,
//! so a consumer can never mistake the builtin packaging for one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inputs::{PublicInputs, Witness};

/// Scheme tag of the builtin signature-packaging proof.
pub const RECEIPT_SIG_SCHEME: &str = "receipt_sig";

/// A proof over (public inputs, witness), builtin or external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Deterministic identifier derived from the receipt hash.
    pub proof_id: String,
    /// Proof scheme: `receipt_sig` for the builtin packaging, an
    /// external prover's own tag otherwise.
    pub scheme: String,
    /// True whenever no real external proof was produced, including the
    /// default builtin path. Never silently false.
    #[serde(default)]
    pub fallback: bool,
    /// Why the external prover was not used, when it was configured but
    /// failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// The proof payload. For `receipt_sig` this is the verified
    /// signature itself.
    pub proof: String,
    /// The public inputs this proof binds to.
    pub public_inputs: PublicInputs,
    /// Disclosure-safe summary of the witness the proof was built from.
    pub witness_summary: WitnessSummary,
}

impl Proof {
    /// True when this proof is the builtin signature packaging rather
    /// than an external prover's output.
    pub fn is_receipt_sig(&self) -> bool {
        self.scheme == RECEIPT_SIG_SCHEME
    }

    /// Record the reason the external prover was bypassed.
    pub fn with_fallback_reason(mut self, reason: impl Into<String>) -> Self {
        self.fallback = true;
        self.fallback_reason = Some(reason.into());
        self
    }
}

/// What a proof discloses about its witness: identifiers and sizes,
/// never the canonical bytes or signature material beyond the payload
/// the scheme itself carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessSummary {
    /// The receipt's identifier, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    /// The anchor transaction hash, if the receipt was anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_tx_hash: Option<String>,
    /// Byte length of the canonical receipt.
    pub canonical_len: usize,
}

impl WitnessSummary {
    /// Summarize a witness.
    pub fn from_witness(witness: &Witness) -> Self {
        Self {
            receipt_id: witness.receipt_id.clone(),
            anchor_tx_hash: witness
                .anchor
                .as_ref()
                .and_then(|a| a.get("l2_tx"))
                .and_then(|l| l.get("tx_hash"))
                .and_then(Value::as_str)
                .map(String::from),
            canonical_len: witness.canonical_receipt.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arv_crypto::{GatewayAddress, RecoverableSignature, SignerMode};

    fn sample_inputs() -> PublicInputs {
        PublicInputs {
            receipt_hash: format!("0x{}", "ab".repeat(32)),
            policy_hash: "0xAA".into(),
            consent_hash: "0xBB".into(),
            gateway_address: GatewayAddress::from_bytes([0x11; 20]),
            signer_mode: SignerMode::Fixed,
            anchor_tx_hash: None,
            receipt_id_hash: None,
        }
    }

    #[test]
    fn test_witness_summary_extracts_anchor_tx() {
        let w = Witness {
            canonical_receipt: "{}".into(),
            signature: RecoverableSignature::from_bytes([0; 65]),
            receipt_id: Some("r1".into()),
            anchor: Some(serde_json::json!({"l2_tx": {"tx_hash": "0xfeed"}})),
        };
        let summary = WitnessSummary::from_witness(&w);
        assert_eq!(summary.receipt_id.as_deref(), Some("r1"));
        assert_eq!(summary.anchor_tx_hash.as_deref(), Some("0xfeed"));
        assert_eq!(summary.canonical_len, 2);
    }

    #[test]
    fn test_proof_serde_roundtrip_preserves_fallback() {
        let proof = Proof {
            proof_id: "proof_ab".into(),
            scheme: RECEIPT_SIG_SCHEME.into(),
            fallback: true,
            fallback_reason: Some("no prover configured".into()),
            proof: "0x42".into(),
            public_inputs: sample_inputs(),
            witness_summary: WitnessSummary {
                receipt_id: None,
                anchor_tx_hash: None,
                canonical_len: 2,
            },
        };
        let json = serde_json::to_string(&proof).unwrap();
        let back: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
        assert!(back.is_receipt_sig());
    }

    #[test]
    fn test_external_proof_without_fallback_fields_parses() {
        // An external prover is not required to emit fallback fields.
        let json = serde_json::json!({
            "proof_id": "proof_x",
            "scheme": "stark-v1",
            "proof": "0xcafe",
            "public_inputs": sample_inputs(),
            "witness_summary": {"canonical_len": 9}
        });
        let proof: Proof = serde_json::from_value(json).unwrap();
        assert!(!proof.fallback);
        assert!(proof.fallback_reason.is_none());
        assert!(!proof.is_receipt_sig());
    }

    #[test]
    fn test_with_fallback_reason_sets_flag() {
        let proof = Proof {
            proof_id: "p".into(),
            scheme: RECEIPT_SIG_SCHEME.into(),
            fallback: false,
            fallback_reason: None,
            proof: "0x".into(),
            public_inputs: sample_inputs(),
            witness_summary: WitnessSummary {
                receipt_id: None,
                anchor_tx_hash: None,
                canonical_len: 0,
            },
        }
        .with_fallback_reason("prover timed out");
        assert!(proof.fallback);
        assert_eq!(proof.fallback_reason.as_deref(), Some("prover timed out"));
    }
}
