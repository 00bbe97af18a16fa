//! # Environment configuration
//!
//! Everything the orchestration layer takes from the environment, read
//! once at startup into a typed value: the external prover command and
//! its time bound, the gateway base address, and the default artifact
//! directory. CLI flags override these where both exist.

use std::path::PathBuf;
use std::time::Duration;

use arv_prover::{ExternalProver, ProverError, ProverStrategy};

/// External prover command line (whitespace-separated).
pub const PROVER_CMD_VAR: &str = "ARV_PROVER_CMD";

/// External prover time bound in seconds.
pub const PROVER_TIMEOUT_VAR: &str = "ARV_PROVER_TIMEOUT_SECS";

/// Gateway base address for receipt retrieval.
pub const GATEWAY_URL_VAR: &str = "ARV_GATEWAY_URL";

/// Default directory for artifacts when no explicit paths are given.
pub const OUT_DIR_VAR: &str = "ARV_OUT_DIR";

/// Gateway address used when `ARV_GATEWAY_URL` is unset.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:4005";

/// Prover deadline used when `ARV_PROVER_TIMEOUT_SECS` is unset.
pub const DEFAULT_PROVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Decoded environment configuration for one process.
#[derive(Debug, Clone)]
pub struct RunEnv {
    /// External prover command, when one is configured.
    pub prover_cmd: Option<String>,
    /// Bound on the external prover's wall-clock time.
    pub prover_timeout: Duration,
    /// Base URL of the gateway.
    pub gateway_url: String,
    /// Default artifact directory.
    pub out_dir: Option<PathBuf>,
}

impl RunEnv {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Decode configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset. An unparseable timeout falls back
    /// to the default with a warning rather than aborting the run.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let prover_timeout = non_blank(PROVER_TIMEOUT_VAR)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %raw, "unparseable {PROVER_TIMEOUT_VAR}, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_PROVER_TIMEOUT);

        Self {
            prover_cmd: non_blank(PROVER_CMD_VAR),
            prover_timeout,
            gateway_url: non_blank(GATEWAY_URL_VAR)
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            out_dir: non_blank(OUT_DIR_VAR).map(PathBuf::from),
        }
    }

    /// The prover strategy this configuration selects: `External` when
    /// a command is present, `Builtin` otherwise.
    pub fn prover_strategy(&self) -> Result<ProverStrategy, ProverError> {
        match &self.prover_cmd {
            Some(cmd) => Ok(ProverStrategy::External(ExternalProver::from_command_line(
                cmd,
                self.prover_timeout,
            )?)),
            None => Ok(ProverStrategy::Builtin),
        }
    }
}
