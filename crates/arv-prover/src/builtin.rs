//! # Builtin signature-packaging proof
//!
//! The deterministic default when no external prover is configured or
//! the configured one fails. It packages the already-verified signature
//! and the public inputs into a `receipt_sig`-tagged proof.
//!
//! ## What this proves
//!
//! Only that this pipeline recovered a valid signature over the
//! canonical receipt and that the embedded public inputs are the ones it
//! computed. Anyone holding the proof can re-run recovery over the
//! canonical bytes and compare against `gateway_address`. It is NOT a
//! zero-knowledge proof and the `fallback: true` flag says so.

use crate::inputs::{PublicInputs, Witness};
use crate::proof::{Proof, WitnessSummary, RECEIPT_SIG_SCHEME};

/// Deterministically package the verified signature and public inputs.
///
/// Always succeeds on well-formed inputs: the payload is the signature
/// itself, the proof id derives from the receipt hash, and the witness
/// appears only as its summary.
pub fn prove(public_inputs: &PublicInputs, witness: &Witness) -> Proof {
    Proof {
        proof_id: format!(
            "proof_{}",
            public_inputs.receipt_hash.trim_start_matches("0x")
        ),
        scheme: RECEIPT_SIG_SCHEME.to_string(),
        fallback: true,
        fallback_reason: None,
        proof: witness.signature.to_prefixed_hex(),
        public_inputs: public_inputs.clone(),
        witness_summary: WitnessSummary::from_witness(witness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arv_core::{sha256_digest, Receipt};
    use arv_crypto::{
        signing_digest, verify_signer, ExpectedSigner, GatewayAddress, RecoverableSignature,
        SignerMode,
    };
    use k256::ecdsa::SigningKey;

    use crate::inputs::{build_public_inputs, build_witness};

    fn key_one() -> SigningKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        SigningKey::from_slice(&bytes).unwrap()
    }

    fn signed_fixture() -> (Proof, GatewayAddress) {
        let receipt = Receipt::from_json_str(
            r#"{"receipt_id": "r1", "amount": 123, "policy_hash": "0xAA", "consent_snapshot_hash": "0xBB"}"#,
        )
        .unwrap();
        let canonical = receipt.canonical().unwrap();
        let digest = signing_digest(&canonical);

        let key = key_one();
        let (sig, rec_id) = key.sign_prehash_recoverable(digest.as_bytes()).unwrap();
        let mut sig_bytes = [0u8; 65];
        sig_bytes[..64].copy_from_slice(&sig.to_bytes());
        sig_bytes[64] = rec_id.to_byte() + 27;
        let signature = RecoverableSignature::from_bytes(sig_bytes);

        let gateway = verify_signer(&digest, &signature, &ExpectedSigner::Any).unwrap();
        let pi = build_public_inputs(&receipt, &sha256_digest(&canonical), gateway, SignerMode::Auto);
        let witness = build_witness(&receipt, &canonical, &signature);
        (prove(&pi, &witness), gateway)
    }

    #[test]
    fn test_builtin_proof_shape() {
        let (proof, _) = signed_fixture();
        assert!(proof.is_receipt_sig());
        assert!(proof.fallback);
        assert!(proof.fallback_reason.is_none());
        assert!(proof.proof_id.starts_with("proof_"));
        assert!(!proof.proof_id.contains("0x"));
    }

    #[test]
    fn test_builtin_proof_deterministic() {
        let (a, _) = signed_fixture();
        let (b, _) = signed_fixture();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_reverification() {
        // The embedded signature, re-verified against the canonical
        // bytes behind the embedded public inputs, must recover the
        // embedded gateway address.
        let (proof, gateway) = signed_fixture();

        let receipt = Receipt::from_json_str(
            r#"{"receipt_id": "r1", "amount": 123, "policy_hash": "0xAA", "consent_snapshot_hash": "0xBB"}"#,
        )
        .unwrap();
        let digest = signing_digest(&receipt.canonical().unwrap());
        let signature = RecoverableSignature::from_hex(&proof.proof).unwrap();
        let recovered =
            verify_signer(&digest, &signature, &ExpectedSigner::Fixed(gateway)).unwrap();
        assert_eq!(recovered, proof.public_inputs.gateway_address);
    }
}
