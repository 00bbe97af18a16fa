//! # arv-stdin-prover
//!
//! An implementation of the external-prover I/O contract: reads one
//! `{"public_inputs": ..., "witness": ...}` JSON object from stdin, writes
//! one proof JSON object to stdout, exits 0.
//!
//! The proof it emits is the builtin `receipt_sig` packaging, so this
//! binary adds no cryptographic strength over the builtin path. It
//! exists to exercise the external-prover hand-off end to end: set
//! `ARV_PROVER_CMD` to this binary and the pipeline's spawn / write /
//! read / parse plumbing runs for real.

use std::io::Read;

use arv_prover::{builtin, PublicInputs, Witness};
use serde::Deserialize;

/// The payload the pipeline writes to an external prover.
#[derive(Deserialize)]
struct ProverInput {
    public_inputs: PublicInputs,
    witness: Witness,
}

fn main() -> anyhow::Result<()> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    let input: ProverInput = serde_json::from_str(&buf)?;
    let proof = builtin::prove(&input.public_inputs, &input.witness);
    println!("{}", serde_json::to_string(&proof)?);
    Ok(())
}
