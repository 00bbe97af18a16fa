//! # External prover invocation
//!
//! Runs a configured out-of-process prover under a fixed I/O contract:
//! one JSON object `{"public_inputs": ..., "witness": ...}` is written to
//! the process's standard input, one proof JSON object is read from its
//! standard output, and exit status 0 means success.
//!
//! ## Bounded, cancellable wait
//!
//! The invocation is modeled as a task with an explicit deadline and a
//! termination action, never a fire-and-forget call. The child is polled
//! with `try_wait()`; at the deadline it is killed and reaped, so a hung
//! prover can neither stall the pipeline nor leak a process. Pipe
//! draining happens on dedicated threads so a prover that floods stdout
//! cannot deadlock against a full pipe buffer.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ProverError;
use crate::inputs::{PublicInputs, Witness};
use crate::proof::Proof;

/// How often the child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Cap on the stderr excerpt carried in errors.
const STDERR_EXCERPT_LEN: usize = 512;

/// A configured external prover command with its time bound.
#[derive(Debug, Clone)]
pub struct ExternalProver {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalProver {
    /// Build a prover from a whitespace-separated command line, as it
    /// arrives from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProverError::Unavailable` for an empty command.
    pub fn from_command_line(command: &str, timeout: Duration) -> Result<Self, ProverError> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ProverError::Unavailable("empty prover command".to_string()))?
            .to_string();
        Ok(Self {
            program,
            args: parts.map(String::from).collect(),
            timeout,
        })
    }

    /// The configured command line, for logging.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The configured time bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke the prover over (public inputs, witness).
    ///
    /// # Errors
    ///
    /// - `Unavailable`: the process could not be spawned.
    /// - `Timeout`: the deadline passed; the child was killed and reaped.
    /// - `Failed`: the child exited non-zero.
    /// - `OutputInvalid`: exit 0 but stdout did not parse as a proof.
    pub fn prove(&self, public_inputs: &PublicInputs, witness: &Witness) -> Result<Proof, ProverError> {
        let payload = serde_json::to_vec(&serde_json::json!({
            "public_inputs": public_inputs,
            "witness": witness,
        }))
        .map_err(|e| ProverError::InputEncoding(e.to_string()))?;

        tracing::debug!(command = %self.command_line(), timeout = ?self.timeout, "invoking external prover");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ProverError::Unavailable(format!("failed to spawn {}: {e}", self.program))
            })?;

        // Feed stdin and drain stdout/stderr on their own threads; a
        // child that exits early or floods a pipe must not block us.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                let _ = stdin.write_all(&payload);
            })
        });
        let stdout_reader = child.stdout.take().map(spawn_drain);
        let stderr_reader = child.stderr.take().map(spawn_drain);

        let status = match self.wait_with_deadline(&mut child) {
            Ok(status) => status,
            Err(e) => {
                join_quietly(writer);
                join_drain(stdout_reader);
                join_drain(stderr_reader);
                return Err(e);
            }
        };

        join_quietly(writer);
        let stdout = join_drain(stdout_reader);
        let stderr = join_drain(stderr_reader);

        if !status.success() {
            return Err(ProverError::Failed {
                status: status
                    .code()
                    .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}")),
                stderr: excerpt(&stderr),
            });
        }

        serde_json::from_slice(&stdout)
            .map_err(|e| ProverError::OutputInvalid(format!("{e}; stderr: {}", excerpt(&stderr))))
    }

    /// Poll the child until exit or deadline; kill and reap on timeout.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<std::process::ExitStatus, ProverError> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProverError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn spawn_drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_drain(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn join_quietly(handle: Option<thread::JoinHandle<()>>) {
    if let Some(h) = handle {
        let _ = h.join();
    }
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.chars().count() > STDERR_EXCERPT_LEN {
        let cut: String = trimmed.chars().take(STDERR_EXCERPT_LEN).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arv_crypto::{GatewayAddress, RecoverableSignature, SignerMode};

    use crate::builtin;
    use crate::inputs::PublicInputs;

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

    fn sample_witness() -> Witness {
        Witness {
            canonical_receipt: r#"{"amount":123}"#.into(),
            signature: RecoverableSignature::from_bytes([0x42; 65]),
            receipt_id: Some("r1".into()),
            anchor: None,
        }
    }

    #[test]
    fn test_empty_command_unavailable() {
        match ExternalProver::from_command_line("   ", Duration::from_secs(1)).unwrap_err() {
            ProverError::Unavailable(_) => {}
            other => panic!("expected Unavailable, got: {other}"),
        }
    }

    #[test]
    fn test_command_line_roundtrip() {
        let p = ExternalProver::from_command_line("prover --flag x", Duration::from_secs(1)).unwrap();
        assert_eq!(p.command_line(), "prover --flag x");
        assert_eq!(p.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_binary_unavailable() {
        let p = ExternalProver::from_command_line(
            "/nonexistent/arv-prover-binary",
            Duration::from_secs(1),
        )
        .unwrap();
        match p.prove(&sample_inputs(), &sample_witness()).unwrap_err() {
            ProverError::Unavailable(msg) => assert!(msg.contains("failed to spawn")),
            other => panic!("expected Unavailable, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_failed() {
        let p = ExternalProver::from_command_line("false", Duration::from_secs(5)).unwrap();
        match p.prove(&sample_inputs(), &sample_witness()).unwrap_err() {
            ProverError::Failed { status, .. } => assert!(status.contains("1")),
            other => panic!("expected Failed, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unparseable_output_invalid() {
        // `cat` echoes the input payload, which is not a proof object.
        let p = ExternalProver::from_command_line("cat", Duration::from_secs(5)).unwrap();
        match p.prove(&sample_inputs(), &sample_witness()).unwrap_err() {
            ProverError::OutputInvalid(_) => {}
            other => panic!("expected OutputInvalid, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_prover_times_out_and_is_killed() {
        let p = ExternalProver::from_command_line("sleep 30", Duration::from_millis(200)).unwrap();
        let start = Instant::now();
        match p.prove(&sample_inputs(), &sample_witness()).unwrap_err() {
            ProverError::Timeout(t) => assert_eq!(t, Duration::from_millis(200)),
            other => panic!("expected Timeout, got: {other}"),
        }
        // The wait is bounded: nowhere near the 30s sleep.
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_valid_proof_output_accepted() {
        // A "prover" that emits a fixed proof document: cat of a file
        // containing valid proof JSON.
        let proof = builtin::prove(&sample_inputs(), &sample_witness());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.json");
        std::fs::write(&path, serde_json::to_vec(&proof).unwrap()).unwrap();

        let p = ExternalProver::from_command_line(
            &format!("cat {}", path.display()),
            Duration::from_secs(5),
        )
        .unwrap();
        let parsed = p.prove(&sample_inputs(), &sample_witness()).unwrap();
        assert_eq!(parsed, proof);
    }
}
