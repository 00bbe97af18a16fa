//! # Prover failure taxonomy
//!
//! Every way an external prover invocation can fail, kept distinct so
//! the orchestrator's fallback is attributable: a missing binary, a
//! crashing prover, a hung prover, and a prover that produced garbage
//! are different operational events even though all four trigger the
//! same builtin fallback.

use std::time::Duration;

use thiserror::Error;

/// Error from the external prover invocation.
///
/// These are the only errors in the stack that are locally recovered:
/// the orchestrator falls back to the builtin proof and records the
/// reason. Cryptographic and consistency failures never pass through
/// here.
#[derive(Error, Debug)]
pub enum ProverError {
    /// The prover command is empty or the process could not be spawned.
    #[error("external prover unavailable: {0}")]
    Unavailable(String),

    /// The prover exited with a non-zero status.
    #[error("external prover failed ({status}): {stderr}")]
    Failed {
        /// Exit status rendering (code or signal).
        status: String,
        /// Captured standard error, truncated.
        stderr: String,
    },

    /// The prover exceeded the time bound and was terminated.
    #[error("external prover timed out after {0:?} and was killed")]
    Timeout(Duration),

    /// The prover exited successfully but its output did not parse as a
    /// proof.
    #[error("external prover output is not a valid proof: {0}")]
    OutputInvalid(String),

    /// The prover input payload could not be encoded.
    #[error("failed to encode prover input: {0}")]
    InputEncoding(String),

    /// I/O failure while talking to the prover process.
    #[error("i/o error during prover invocation: {0}")]
    Io(#[from] std::io::Error),
}
