//! # arv-pipeline: the receipt verification pipeline
//!
//! Sequences the whole trust check for one receipt:
//! canonicalize → hash → recover and compare the signer → compare the
//! policy/consent commitments → build public inputs and witness → prove.
//! Data flow is strictly linear and single-pass; each step consumes only
//! the prior step's output.
//!
//! ## Failure Reporting
//!
//! Cryptographic and consistency failures are never recovered locally:
//! they surface as an explicit failed `VerificationResult` that lists
//! every check that failed, not just the first, with public inputs still
//! computed wherever possible for audit. The only locally recovered
//! failure is prover selection, which falls back to the builtin
//! `receipt_sig` packaging with an explicit, logged reason.
//!
//! ## Concurrency
//!
//! A run is synchronous and holds no shared state; independent runs may
//! execute in parallel freely. The only suspension point is the external
//! prover child process, which is bounded and cancellable in
//! `arv-prover`.

pub mod checks;
pub mod state;
pub mod verifier;

pub use checks::{check_commitments, CheckFailure, CheckKind};
pub use state::PipelineState;
pub use verifier::{
    verify_and_prove, PipelineOutcome, VerificationResult, VerificationStatus, VerifyRequest,
};
