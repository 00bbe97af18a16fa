//! # Fetch subcommand
//!
//! Retrieves a receipt from the gateway by id and writes it to a file
//! or stdout. Retrieval performs no verification; it exists so a
//! receipt can be inspected or handed to `arv verify` without any other
//! tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::artifacts::write_json;
use crate::env::RunEnv;
use crate::gateway::GatewayClient;

/// Arguments for the fetch subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// The receipt id to retrieve.
    pub receipt_id: String,

    /// Write the receipt here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the fetch subcommand.
pub fn run_fetch(args: &FetchArgs, env: &RunEnv) -> Result<u8> {
    let client = GatewayClient::new(&env.gateway_url)?;
    let receipt = client
        .receipt(&args.receipt_id)
        .with_context(|| format!("failed to fetch receipt {}", args.receipt_id))?;

    match &args.out {
        Some(path) => {
            write_json(path, receipt.as_value())?;
            println!("saved receipt {} to {}", args.receipt_id, path.display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(receipt.as_value())?);
        }
    }
    Ok(0)
}
