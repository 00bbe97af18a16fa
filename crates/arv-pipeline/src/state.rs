//! # Pipeline states
//!
//! The orchestrator advances through a fixed sequence of states, one per
//! step, with `Failed` reachable from any of them. States exist for
//! observability: every transition is traced, and a failure names the
//! state it originated in.

/// Where a pipeline run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has run yet.
    Start,
    /// Canonical bytes of the signed content exist.
    Canonicalized,
    /// Receipt hash and signing digest are computed.
    Hashed,
    /// Signature recovery and signer comparison have run.
    SignatureChecked,
    /// Policy and consent commitments have been compared.
    ConsistencyChecked,
    /// Public inputs and witness are assembled.
    InputsBuilt,
    /// A proof (builtin or external) exists.
    Proved,
    /// Terminal success.
    Done,
    /// Terminal failure; the failed checks name the originating step.
    Failed,
}

impl PipelineState {
    /// The state name as it appears in traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Canonicalized => "canonicalized",
            Self::Hashed => "hashed",
            Self::SignatureChecked => "signature_checked",
            Self::ConsistencyChecked => "consistency_checked",
            Self::InputsBuilt => "inputs_built",
            Self::Proved => "proved",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advance the run to `next`, tracing the transition.
pub(crate) fn advance(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!(from = %state, to = %next, "pipeline transition");
    *state = next;
}
