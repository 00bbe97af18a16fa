//! # arv-cli: the command-line surface of the ARV stack
//!
//! Provides the `arv` binary:
//!
//! - `arv verify` runs the full verification pipeline over a receipt
//!   (from a file or fetched from the gateway), writes the
//!   `public.json` / `witness.json` / `proof.json` artifacts, and exits
//!   0 only when every check passed.
//! - `arv fetch` retrieves a receipt from the gateway by id.
//!
//! A second binary, `arv-stdin-prover`, implements the external-prover
//! I/O contract with the builtin packaging, for end-to-end plumbing
//! tests of the prover hand-off.
//!
//! Environment configuration is decoded once into [`env::RunEnv`] at
//! startup; handlers never read variables ad hoc.

pub mod artifacts;
pub mod env;
pub mod fetch;
pub mod gateway;
pub mod verify;
