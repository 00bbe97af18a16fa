//! # Verify subcommand
//!
//! Runs the full pipeline over one receipt and persists the artifacts.
//! Exit code 0 means every check passed and a proof was written; any
//! verification failure exits 1 after printing every failing check, with
//! public inputs and witness still written (tagged unverified) for
//! diagnosis.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arv_core::Receipt;
use arv_crypto::ExpectedSigner;
use arv_pipeline::{verify_and_prove, PipelineOutcome, VerifyRequest};
use clap::Args;

use crate::artifacts::{write_json, write_json_unverified};
use crate::env::RunEnv;
use crate::gateway::GatewayClient;

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the receipt JSON document.
    #[arg(long, required_unless_present = "receipt_id", conflicts_with = "receipt_id")]
    pub receipt: Option<PathBuf>,

    /// Fetch the receipt from the gateway by id instead of a file.
    #[arg(long)]
    pub receipt_id: Option<String>,

    /// 65-byte r||s||v signature hex. Defaults to the receipt's own
    /// receipt_sig field.
    #[arg(long)]
    pub signature: Option<String>,

    /// Expected gateway signer: a 0x-address, or "auto" to accept
    /// whichever address the signature recovers to.
    #[arg(long)]
    pub gateway: String,

    /// Expected policy hash commitment.
    #[arg(long)]
    pub policy_hash: String,

    /// Expected consent snapshot hash commitment.
    #[arg(long)]
    pub consent_hash: String,

    /// Path for the public inputs artifact.
    #[arg(long)]
    pub out_public: Option<PathBuf>,

    /// Path for the witness artifact.
    #[arg(long)]
    pub out_witness: Option<PathBuf>,

    /// Path for the proof artifact.
    #[arg(long)]
    pub out_proof: Option<PathBuf>,

    /// Directory for all three artifacts when explicit paths are not
    /// given. Keyed by receipt id, so concurrent runs never clobber
    /// each other.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, env: &RunEnv) -> Result<u8> {
    let receipt = load_receipt(args, env)?;
    let signature = args
        .signature
        .clone()
        .or_else(|| receipt.receipt_sig().map(String::from))
        .context("no --signature given and the receipt carries no receipt_sig field")?;
    let expected_signer =
        ExpectedSigner::parse(&args.gateway).context("invalid --gateway value")?;
    let request = VerifyRequest {
        expected_signer,
        expected_policy_hash: args.policy_hash.clone(),
        expected_consent_hash: args.consent_hash.clone(),
    };
    let prover = env
        .prover_strategy()
        .context("invalid external prover configuration")?;

    let outcome = verify_and_prove(&receipt, &signature, &request, &prover);
    let paths = ArtifactPaths::resolve(args, env, receipt.receipt_id());

    if outcome.result.is_verified() {
        report_success(&outcome, &paths)
    } else {
        report_failure(&outcome, &paths)
    }
}

fn load_receipt(args: &VerifyArgs, env: &RunEnv) -> Result<Receipt> {
    if let Some(path) = &args.receipt {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read receipt {}", path.display()))?;
        return Receipt::from_json_str(&data)
            .with_context(|| format!("invalid receipt document {}", path.display()));
    }
    let receipt_id = args
        .receipt_id
        .as_deref()
        .context("either --receipt or --receipt-id is required")?;
    let client = GatewayClient::new(&env.gateway_url)?;
    Ok(client.receipt(receipt_id)?)
}

fn report_success(outcome: &PipelineOutcome, paths: &ArtifactPaths) -> Result<u8> {
    let public_inputs = outcome
        .result
        .public_inputs
        .as_ref()
        .context("verified run is missing public inputs")?;
    let witness = outcome
        .witness
        .as_ref()
        .context("verified run is missing a witness")?;
    let proof = outcome
        .proof
        .as_ref()
        .context("verified run is missing a proof")?;

    println!("signature ok, policy/consent ok");
    println!("receipt_hash: {}", public_inputs.receipt_hash);
    println!(
        "gateway_address: {} ({} mode)",
        public_inputs.gateway_address, public_inputs.signer_mode
    );
    println!(
        "proof scheme: {} (fallback: {})",
        proof.scheme, proof.fallback
    );
    if let Some(reason) = &proof.fallback_reason {
        println!("fallback reason: {reason}");
    }

    match (&paths.public, &paths.witness, &paths.proof) {
        (Some(public), Some(witness_path), Some(proof_path)) => {
            write_json(public, public_inputs)?;
            println!("saved public inputs to {}", public.display());
            write_json(witness_path, witness)?;
            println!("saved witness to {}", witness_path.display());
            write_json(proof_path, proof)?;
            println!("saved proof to {}", proof_path.display());
        }
        _ => {
            // No destination configured: emit the artifacts on stdout.
            println!("public inputs:");
            println!("{}", serde_json::to_string_pretty(public_inputs)?);
            println!("proof:");
            println!("{}", serde_json::to_string_pretty(proof)?);
        }
    }
    Ok(0)
}

fn report_failure(outcome: &PipelineOutcome, paths: &ArtifactPaths) -> Result<u8> {
    eprintln!("verification failed:");
    for failure in &outcome.result.failed_checks {
        eprintln!("  {failure}");
    }

    // Diagnostic artifacts, tagged unverified. Never a proof.
    if let (Some(path), Some(public_inputs)) = (&paths.public, &outcome.result.public_inputs) {
        write_json_unverified(path, public_inputs)?;
        eprintln!("saved unverified public inputs to {}", path.display());
    }
    if let (Some(path), Some(witness)) = (&paths.witness, &outcome.witness) {
        write_json_unverified(path, witness)?;
        eprintln!("saved unverified witness to {}", path.display());
    }
    Ok(1)
}

/// Where each artifact goes for this run, if anywhere.
#[derive(Debug, Default, PartialEq, Eq)]
struct ArtifactPaths {
    public: Option<PathBuf>,
    witness: Option<PathBuf>,
    proof: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Explicit `--out-*` paths win; otherwise all three land in the
    /// configured directory, keyed by receipt id so concurrent runs use
    /// distinct paths.
    fn resolve(args: &VerifyArgs, env: &RunEnv, receipt_id: Option<&str>) -> Self {
        let dir = args
            .out_dir
            .clone()
            .or_else(|| env.out_dir.clone())
            .map(|base| match receipt_id {
                Some(id) if !id.is_empty() => base.join(id),
                _ => base,
            });
        let in_dir = |name: &str| dir.as_ref().map(|d| d.join(name));
        Self {
            public: args.out_public.clone().or_else(|| in_dir("public.json")),
            witness: args.out_witness.clone().or_else(|| in_dir("witness.json")),
            proof: args.out_proof.clone().or_else(|| in_dir("proof.json")),
        }
    }
}
