//! # Prove and Inputs Subcommands
//!
//! `semaphore prove` generates a proof record from a request file;
//! `semaphore inputs` stops one step earlier and prints the circuit inputs
//! the backend would be given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use semaphore_core::validate::parse_signal;
use semaphore_core::{generate_inputs, Group, Membership, MerkleProof};
use semaphore_proof::Semaphore;

use crate::request::{MembershipSource, ProveRequest};
use crate::settings::{write_output, BackendKind, Settings};

/// Arguments for `semaphore prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Request JSON file.
    #[arg(value_name = "FILE")]
    pub request: PathBuf,

    /// Write the proof record here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `semaphore inputs`.
#[derive(Args, Debug)]
pub struct InputsArgs {
    /// Request JSON file.
    #[arg(value_name = "FILE")]
    pub request: PathBuf,
}

fn read_request(path: &Path) -> Result<ProveRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    ProveRequest::from_json_str(&content)
        .with_context(|| format!("invalid proof request: {}", path.display()))
}

/// Execute `semaphore prove`.
pub async fn run_prove(args: &ProveArgs, settings: &Settings) -> Result<u8> {
    let request = read_request(&args.request)?;
    let identity = request.identity(settings.backend)?;
    let source = request.membership(settings.backend)?;
    let membership = match &source {
        MembershipSource::Path(path) => Membership::Proof(path.clone()),
        MembershipSource::Group(group) => Membership::Group(group),
    };

    let (message, scope, depth) = (&request.message, &request.scope, request.merkle_tree_depth);
    let proof = match settings.backend {
        BackendKind::Bb => {
            Semaphore::from_config(&settings.config)
                .generate_proof(&identity, membership, message, scope, depth)
                .await?
        }
        BackendKind::Mock => {
            settings
                .mock_semaphore()
                .generate_proof(&identity, membership, message, scope, depth)
                .await?
        }
    };

    let json = serde_json::to_vec_pretty(&proof)?;
    write_output(args.out.as_deref(), &json)?;
    tracing::info!(depth = proof.merkle_tree_depth, nullifier = %proof.nullifier, "proof written");
    Ok(0)
}

/// Execute `semaphore inputs`.
pub fn run_inputs(args: &InputsArgs, settings: &Settings) -> Result<u8> {
    let request = read_request(&args.request)?;
    let identity = request.identity(settings.backend)?;
    let merkle_proof: MerkleProof = match request.membership(settings.backend)? {
        MembershipSource::Path(path) => path,
        MembershipSource::Group(group) => Membership::Group(&group as &dyn Group)
            .merkle_proof(&identity)
            .context("identity is not in the group")?,
    };

    let message = parse_signal(&request.message, "message")?;
    let scope = parse_signal(&request.scope, "scope")?;
    let inputs = generate_inputs(
        &identity,
        &merkle_proof,
        &message,
        &scope,
        request.merkle_tree_depth,
    )?;

    write_output(None, &serde_json::to_vec_pretty(&inputs)?)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_reject_missing_request() {
        let settings = Settings {
            config: Default::default(),
            backend: BackendKind::Mock,
        };
        let args = InputsArgs {
            request: PathBuf::from("/nonexistent/request.json"),
        };
        let err = run_inputs(&args, &settings).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read file"));
    }
}
