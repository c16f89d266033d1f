//! # Verify Subcommand
//!
//! Verifies a JSON proof record. Exit status 0 means the backend accepted
//! the proof, 1 means it rejected it; any other failure is reported as an
//! error.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use semaphore_proof::Semaphore;

use crate::settings::{read_proof, BackendKind, Settings};

/// Arguments for `semaphore verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof record JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute `semaphore verify`.
pub async fn run_verify(args: &VerifyArgs, settings: &Settings) -> Result<u8> {
    let proof = read_proof(&args.file)?;
    let valid = match settings.backend {
        BackendKind::Bb => Semaphore::from_config(&settings.config).verify_proof(&proof).await?,
        BackendKind::Mock => settings.mock_semaphore().verify_proof(&proof).await?,
    };

    if valid {
        println!(
            "VALID: depth={} nullifier={}",
            proof.merkle_tree_depth, proof.nullifier
        );
        Ok(0)
    } else {
        println!(
            "INVALID: depth={} nullifier={}",
            proof.merkle_tree_depth, proof.nullifier
        );
        Ok(1)
    }
}
