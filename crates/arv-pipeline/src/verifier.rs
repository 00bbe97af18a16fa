//! # The orchestrator
//!
//! One function, [`verify_and_prove()`], runs the whole pipeline for one
//! receipt and returns everything the caller needs: the verification
//! result, the witness, and (on success) a proof.
//!
//! ## Reporting Under Failure
//!
//! The run transitions to `Failed` as soon as any check fails, but the
//! remaining checks still execute and their failures are all recorded:
//! a mismatching signer does not hide a mismatching consent hash.
//! Public inputs are computed under `Failed` whenever an address is
//! available, either recovered from the signature or supplied by a
//! fixed-mode expectation, so an auditor can see what the pipeline saw.
//!
//! ## Prover Fallback
//!
//! Prover-selection failures are the only locally recovered errors. When
//! the external prover is missing, crashes, hangs past its deadline, or
//! emits garbage, the builtin `receipt_sig` packaging is substituted with
//! `fallback: true` and the reason recorded on the proof. This is logged
//! at `warn` and visible in the artifact; it is never silent.

use arv_core::{sha256_digest, Receipt};
use arv_crypto::{
    signing_digest, verify_signer, CryptoError, ExpectedSigner, GatewayAddress,
    RecoverableSignature,
};
use arv_prover::{
    build_public_inputs, build_witness, builtin, Proof, ProverStrategy, PublicInputs, Witness,
};
use serde::Serialize;

use crate::checks::{check_commitments, CheckFailure, CheckKind};
use crate::state::{advance, PipelineState};

/// What one verification run was asked to check.
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    /// The signer the gateway signature must recover to, or `Any`.
    pub expected_signer: ExpectedSigner,
    /// The policy commitment the receipt must embed.
    pub expected_policy_hash: String,
    /// The consent snapshot commitment the receipt must embed.
    pub expected_consent_hash: String,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Every check passed and a proof was produced.
    Verified,
    /// At least one check failed; no proof was produced.
    Failed,
}

/// Outcome of the verification stage of a run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    /// Whether the receipt verified.
    pub status: VerificationStatus,
    /// Computed public inputs, present even on failure where an address
    /// was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_inputs: Option<PublicInputs>,
    /// Every check that failed, in pipeline order.
    pub failed_checks: Vec<CheckFailure>,
}

impl VerificationResult {
    /// True when the receipt verified.
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The verification result, including any failed checks.
    pub result: VerificationResult,
    /// The witness, when the signature was at least parseable.
    pub witness: Option<Witness>,
    /// The proof; present only when verification succeeded.
    pub proof: Option<Proof>,
}

/// Run the full pipeline for one receipt.
///
/// The signature arrives as hex so that a malformed triple is reported
/// as a failed check rather than a caller-side error; every other input
/// is already decoded at the API boundary.
pub fn verify_and_prove(
    receipt: &Receipt,
    signature_hex: &str,
    request: &VerifyRequest,
    prover: &ProverStrategy,
) -> PipelineOutcome {
    let mut state = PipelineState::Start;
    let mut failures: Vec<CheckFailure> = Vec::new();

    let canonical = match receipt.canonical() {
        Ok(canonical) => canonical,
        Err(e) => {
            tracing::error!(error = %e, "receipt canonicalization failed");
            advance(&mut state, PipelineState::Failed);
            return PipelineOutcome {
                result: VerificationResult {
                    status: VerificationStatus::Failed,
                    public_inputs: None,
                    failed_checks: vec![CheckFailure::new(
                        CheckKind::Canonicalization,
                        e.to_string(),
                    )],
                },
                witness: None,
                proof: None,
            };
        }
    };
    advance(&mut state, PipelineState::Canonicalized);

    let receipt_hash = sha256_digest(&canonical);
    let digest = signing_digest(&canonical);
    advance(&mut state, PipelineState::Hashed);

    // Signature stage. Recovery failure and signer mismatch are
    // different checks; a mismatch still yields the recovered address
    // for the public inputs, because that is what an auditor needs to
    // see.
    let mut gateway_address: Option<GatewayAddress> = None;
    let signature = match RecoverableSignature::from_hex(signature_hex) {
        Ok(sig) => {
            match verify_signer(&digest, &sig, &request.expected_signer) {
                Ok(addr) => gateway_address = Some(addr),
                Err(CryptoError::SignerMismatch { expected, recovered }) => {
                    failures.push(CheckFailure::new(
                        CheckKind::SignatureMismatch,
                        format!("expected {expected}, recovered {recovered}"),
                    ));
                    gateway_address = Some(recovered);
                }
                Err(e) => {
                    failures.push(CheckFailure::new(CheckKind::SignatureMalformed, e.to_string()));
                }
            }
            Some(sig)
        }
        Err(e) => {
            failures.push(CheckFailure::new(CheckKind::SignatureMalformed, e.to_string()));
            None
        }
    };
    advance(&mut state, PipelineState::SignatureChecked);

    failures.extend(check_commitments(
        receipt,
        &request.expected_policy_hash,
        &request.expected_consent_hash,
    ));
    advance(&mut state, PipelineState::ConsistencyChecked);

    let signer_mode = request.expected_signer.mode();

    if failures.is_empty() {
        // The empty failure list implies the signature parsed and the
        // signer verified, so both values are present here.
        if let (Some(sig), Some(addr)) = (signature, gateway_address) {
            let public_inputs = build_public_inputs(receipt, &receipt_hash, addr, signer_mode);
            let witness = build_witness(receipt, &canonical, &sig);
            advance(&mut state, PipelineState::InputsBuilt);

            let proof = run_prover(prover, &public_inputs, &witness);
            advance(&mut state, PipelineState::Proved);
            advance(&mut state, PipelineState::Done);

            tracing::info!(
                receipt_hash = %public_inputs.receipt_hash,
                gateway = %addr,
                scheme = %proof.scheme,
                fallback = proof.fallback,
                "receipt verified"
            );
            return PipelineOutcome {
                result: VerificationResult {
                    status: VerificationStatus::Verified,
                    public_inputs: Some(public_inputs),
                    failed_checks: Vec::new(),
                },
                witness: Some(witness),
                proof: Some(proof),
            };
        }
    }

    // Failure path: report everything computable. A fixed-mode
    // expectation stands in for the address when recovery itself failed.
    let address_for_inputs = gateway_address.or_else(|| request.expected_signer.fixed_address());
    let public_inputs = address_for_inputs
        .map(|addr| build_public_inputs(receipt, &receipt_hash, addr, signer_mode));
    let witness = signature.map(|sig| build_witness(receipt, &canonical, &sig));
    advance(&mut state, PipelineState::InputsBuilt);
    advance(&mut state, PipelineState::Failed);

    tracing::warn!(
        failed_checks = failures.len(),
        receipt_hash = %receipt_hash.to_prefixed_hex(),
        "receipt verification failed"
    );
    PipelineOutcome {
        result: VerificationResult {
            status: VerificationStatus::Failed,
            public_inputs,
            failed_checks: failures,
        },
        witness,
        proof: None,
    }
}

/// Apply the prover strategy with the documented fallback rule.
///
/// External failures of any kind degrade to the builtin packaging with
/// the reason recorded on the proof; builtin never fails.
fn run_prover(prover: &ProverStrategy, public_inputs: &PublicInputs, witness: &Witness) -> Proof {
    match prover {
        ProverStrategy::Builtin => builtin::prove(public_inputs, witness),
        ProverStrategy::External(external) => {
            match external.prove(public_inputs, witness) {
                Ok(proof) => proof,
                Err(e) => {
                    tracing::warn!(
                        command = %external.command_line(),
                        error = %e,
                        "external prover failed, falling back to receipt_sig packaging"
                    );
                    builtin::prove(public_inputs, witness).with_fallback_reason(e.to_string())
                }
            }
        }
    }
}
