//! # arv-prover: proof-side types and the prover strategy
//!
//! Builds the two halves a proof consumes from a verified receipt
//! (`PublicInputs`, safe to disclose; `Witness`, potentially sensitive)
//! and produces a `Proof` from them through one of two strategies:
//!
//! - **Builtin**: deterministic packaging of the verified signature and
//!   public inputs, tagged `receipt_sig`. Not a zero-knowledge proof; it
//!   attests only that this pipeline saw a valid signature, and exists as
//!   the safe default when no real prover is configured.
//! - **External**: an out-of-process prover invoked over a fixed
//!   JSON-on-stdin / JSON-on-stdout contract with a bounded, cancellable
//!   wait.
//!
//! The strategy is a tagged variant, not a dispatch hierarchy: callers
//! pattern-match and apply the fallback rule deterministically.
//!
//! ## Crate Policy
//!
//! - Depends on `arv-core` and `arv-crypto` internally.
//! - The prover never re-checks the signature; it consumes outputs of the
//!   verification pipeline.

pub mod builtin;
pub mod error;
pub mod external;
pub mod inputs;
pub mod proof;

pub use error::ProverError;
pub use external::ExternalProver;
pub use inputs::{build_public_inputs, build_witness, PublicInputs, Witness};
pub use proof::{Proof, WitnessSummary, RECEIPT_SIG_SCHEME};

/// The configured proving strategy for a pipeline run.
///
/// Selection is driven by configuration: an external-prover command in
/// the environment yields `External`, otherwise `Builtin`.
#[derive(Debug, Clone)]
pub enum ProverStrategy {
    /// Deterministic `receipt_sig` packaging of the verified signature.
    Builtin,
    /// Out-of-process prover with a bounded wait.
    External(ExternalProver),
}

impl ProverStrategy {
    /// Produce a proof from public inputs and witness.
    ///
    /// `Builtin` cannot fail on well-formed inputs. `External` surfaces
    /// `ProverError` for the caller's fallback rule; it is never handled
    /// here.
    pub fn prove(&self, public_inputs: &PublicInputs, witness: &Witness) -> Result<Proof, ProverError> {
        match self {
            Self::Builtin => Ok(builtin::prove(public_inputs, witness)),
            Self::External(prover) => prover.prove(public_inputs, witness),
        }
    }

    /// True when this strategy invokes an external process.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}
