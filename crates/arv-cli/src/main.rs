//! # arv CLI entry point
//!
//! Parses command-line arguments, initializes tracing from the
//! verbosity flags, decodes the environment once, and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arv_cli::env::RunEnv;
use arv_cli::fetch::{run_fetch, FetchArgs};
use arv_cli::verify::{run_verify, VerifyArgs};

/// ARV: action receipt verification.
///
/// Verifies gateway-signed action receipts, emits proof-ready public
/// inputs and witness artifacts, and produces a proof through the
/// configured prover.
#[derive(Parser, Debug)]
#[command(name = "arv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a receipt and emit public inputs, witness, and proof.
    Verify(VerifyArgs),

    /// Retrieve a receipt from the gateway by id.
    Fetch(FetchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let env = RunEnv::from_env();

    let result = match cli.command {
        Commands::Verify(args) => run_verify(&args, &env),
        Commands::Fetch(args) => run_fetch(&args, &env),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_verify_from_file() {
        let cli = Cli::try_parse_from([
            "arv",
            "verify",
            "--receipt",
            "receipt.json",
            "--gateway",
            "auto",
            "--policy-hash",
            "0xAA",
            "--consent-hash",
            "0xBB",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify(args) => {
                assert!(args.receipt.is_some());
                assert!(args.receipt_id.is_none());
                assert!(args.signature.is_none());
                assert_eq!(args.gateway, "auto");
            }
            other => panic!("expected verify, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_verify_by_receipt_id() {
        let cli = Cli::try_parse_from([
            "arv",
            "verify",
            "--receipt-id",
            "r1",
            "--gateway",
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
            "--policy-hash",
            "0xAA",
            "--consent-hash",
            "0xBB",
            "--out-dir",
            "artifacts",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(args.receipt_id.as_deref(), Some("r1"));
                assert!(args.out_dir.is_some());
            }
            other => panic!("expected verify, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_receipt_and_receipt_id_together() {
        let result = Cli::try_parse_from([
            "arv",
            "verify",
            "--receipt",
            "receipt.json",
            "--receipt-id",
            "r1",
            "--gateway",
            "auto",
            "--policy-hash",
            "0xAA",
            "--consent-hash",
            "0xBB",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_requires_some_receipt_source() {
        let result = Cli::try_parse_from([
            "arv",
            "verify",
            "--gateway",
            "auto",
            "--policy-hash",
            "0xAA",
            "--consent-hash",
            "0xBB",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_fetch() {
        let cli = Cli::try_parse_from(["arv", "fetch", "r1", "--out", "receipt.json"]).unwrap();
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.receipt_id, "r1");
                assert!(args.out.is_some());
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_verbosity_count() {
        let cli = Cli::try_parse_from(["arv", "-vv", "fetch", "r1"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
