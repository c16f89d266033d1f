//! # Barretenberg CLI Engine
//!
//! Drives the `bb` and `nargo` executables through `tokio::process`. Each
//! loaded instance owns a private temporary directory holding the circuit
//! and its verification key; the directory is removed when the instance is
//! dropped. Every `verify` and `prove` call stages its files in its own
//! subdirectory, so one instance serves overlapping calls.
//!
//! ## Verification
//!
//! ```text
//! bb verify -k vk -p proof -i public_inputs --oracle_hash keccak
//! ```
//!
//! `public_inputs` is the binary concatenation of 32-byte big-endian field
//! elements in circuit order. A zero exit status is `Ok(true)`. A non-zero
//! status whose output reports a failed verification is `Ok(false)`. Any
//! other non-zero status is an error.
//!
//! ## Proving
//!
//! 1. Copy the Noir program into the work directory and write `Prover.toml`.
//! 2. `nargo execute witness` computes the witness.
//! 3. `bb prove` writes `proof` and `public_inputs`.
//!
//! The artifact tree is never written to.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use semaphore_artifacts::CircuitArtifact;
use semaphore_core::{CircuitInputs, FieldElement, PublicInputs};
use tempfile::TempDir;
use tokio::process::Command;

use crate::traits::{BackendError, BackendInstance, BackendOptions, ProofData, ProvingEngine};

const CIRCUIT_FILE: &str = "circuit.json";
const VK_FILE: &str = "vk";
const FIELD_BYTES: usize = 32;

/// Engine backed by the `bb` and `nargo` executables.
#[derive(Debug, Clone)]
pub struct BbCliEngine {
    bb: PathBuf,
    nargo: PathBuf,
}

impl BbCliEngine {
    /// Use the given executables.
    pub fn new(bb: impl Into<PathBuf>, nargo: impl Into<PathBuf>) -> Self {
        Self {
            bb: bb.into(),
            nargo: nargo.into(),
        }
    }
}

impl Default for BbCliEngine {
    fn default() -> Self {
        Self::new("bb", "nargo")
    }
}

/// A circuit staged in a private work directory.
#[derive(Debug)]
pub struct BbCliInstance {
    artifact: Arc<CircuitArtifact>,
    options: BackendOptions,
    bb: PathBuf,
    nargo: PathBuf,
    workdir: TempDir,
}

impl ProvingEngine for BbCliEngine {
    type Instance = BbCliInstance;

    async fn load(
        &self,
        artifact: Arc<CircuitArtifact>,
        options: &BackendOptions,
    ) -> Result<BbCliInstance, BackendError> {
        let workdir = tempfile::Builder::new().prefix("semaphore-bb-").tempdir()?;
        tokio::fs::write(workdir.path().join(CIRCUIT_FILE), &artifact.bytecode).await?;

        let instance = BbCliInstance {
            artifact,
            options: *options,
            bb: self.bb.clone(),
            nargo: self.nargo.clone(),
            workdir,
        };
        match &instance.artifact.verification_key {
            Some(vk) => tokio::fs::write(instance.vk_path(), vk).await?,
            None => instance.write_vk().await?,
        }

        tracing::debug!(
            project = %instance.artifact.project,
            depth = instance.artifact.depth,
            workdir = %instance.workdir.path().display(),
            "circuit loaded into bb"
        );
        Ok(instance)
    }
}

impl BbCliInstance {
    fn path(&self, name: &str) -> PathBuf {
        self.workdir.path().join(name)
    }

    fn vk_path(&self) -> PathBuf {
        self.path(VK_FILE)
    }

    /// Scratch directory for one call, removed when dropped.
    fn call_dir(&self, prefix: &str) -> Result<TempDir, BackendError> {
        Ok(tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(self.workdir.path())?)
    }

    fn bb(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.bb);
        cmd.arg(subcommand)
            .env("HARDWARE_CONCURRENCY", self.options.threads.to_string())
            .current_dir(self.workdir.path())
            .kill_on_drop(true);
        cmd
    }

    async fn write_vk(&self) -> Result<(), BackendError> {
        let mut cmd = self.bb("write_vk");
        cmd.arg("-b")
            .arg(self.path(CIRCUIT_FILE))
            .arg("-o")
            .arg(self.workdir.path())
            .args(["--oracle_hash", self.options.oracle_hash.as_str()]);
        let output = run(cmd, "bb write_vk").await?;
        if !output.status.success() {
            return Err(BackendError::Load(failure_reason(&output)));
        }
        if !tokio::fs::try_exists(self.vk_path()).await? {
            return Err(BackendError::Load(
                "bb write_vk did not produce a verification key".to_string(),
            ));
        }
        Ok(())
    }
}

impl BackendInstance for BbCliInstance {
    async fn verify(
        &self,
        proof: &[u8],
        public_inputs: &PublicInputs,
    ) -> Result<bool, BackendError> {
        check_proof_shape(proof)?;

        let call = self.call_dir("verify-")?;
        let proof_path = call.path().join("proof");
        let inputs_path = call.path().join("public_inputs");
        tokio::fs::write(&proof_path, proof).await?;
        tokio::fs::write(&inputs_path, encode_public_inputs(public_inputs)).await?;

        let mut cmd = self.bb("verify");
        cmd.arg("-k")
            .arg(self.vk_path())
            .arg("-p")
            .arg(&proof_path)
            .arg("-i")
            .arg(&inputs_path)
            .args(["--oracle_hash", self.options.oracle_hash.as_str()]);
        let output = run(cmd, "bb verify").await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        interpret_verify(output.status.success(), &stdout, &stderr).ok_or_else(|| {
            tracing::warn!(stderr = %stderr.trim(), "bb verify exited abnormally");
            BackendError::Execution {
                program: "bb verify".to_string(),
                reason: failure_reason(&output),
            }
        })
    }

    async fn prove(&self, inputs: &CircuitInputs) -> Result<ProofData, BackendError> {
        if inputs.depth() != self.artifact.depth {
            return Err(BackendError::Unsupported(format!(
                "inputs padded to depth {} for a depth-{} circuit",
                inputs.depth(),
                self.artifact.depth
            )));
        }
        let source = self.artifact.source_dir.clone().ok_or_else(|| {
            BackendError::Unsupported(format!(
                "proving at depth {} needs the Noir program directory",
                self.artifact.depth
            ))
        })?;

        let call = self.call_dir("prove-")?;
        let program_dir = call.path().join("program");
        copy_dir(source, program_dir.clone()).await?;
        let prover_toml = prover_toml(inputs)?;
        tokio::fs::write(program_dir.join("Prover.toml"), prover_toml).await?;

        let mut nargo = Command::new(&self.nargo);
        nargo
            .args(["execute", "witness", "--program-dir"])
            .arg(&program_dir)
            .current_dir(&program_dir)
            .kill_on_drop(true);
        let output = run(nargo, "nargo execute").await?;
        if !output.status.success() {
            return Err(BackendError::Execution {
                program: "nargo execute".to_string(),
                reason: failure_reason(&output),
            });
        }

        let out_dir = call.path().join("out");
        tokio::fs::create_dir_all(&out_dir).await?;
        let mut cmd = self.bb("prove");
        cmd.arg("-b")
            .arg(self.path(CIRCUIT_FILE))
            .arg("-w")
            .arg(program_dir.join("target").join("witness.gz"))
            .arg("-k")
            .arg(self.vk_path())
            .arg("-o")
            .arg(&out_dir)
            .args(["--oracle_hash", self.options.oracle_hash.as_str()]);
        let output = run(cmd, "bb prove").await?;
        if !output.status.success() {
            return Err(BackendError::Execution {
                program: "bb prove".to_string(),
                reason: failure_reason(&output),
            });
        }

        let proof = tokio::fs::read(out_dir.join("proof")).await?;
        let public_inputs = decode_public_inputs(&tokio::fs::read(out_dir.join("public_inputs")).await?)?;
        Ok(ProofData {
            proof,
            public_inputs,
        })
    }
}

async fn run(mut cmd: Command, program: &str) -> Result<Output, BackendError> {
    tracing::debug!(program, "spawning");
    cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BackendError::Unsupported(format!("{program}: executable not found"))
        } else {
            BackendError::Io(e)
        }
    })
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {stderr}", output.status)
    }
}

/// Map a finished `bb verify` run to a verdict, or `None` if it did not
/// reach one.
fn interpret_verify(success: bool, stdout: &str, stderr: &str) -> Option<bool> {
    if success {
        return Some(true);
    }
    let combined = format!("{stdout}\n{stderr}").to_ascii_lowercase();
    let rejected = ["verification failed", "verified: 0", "verified: false"]
        .iter()
        .any(|marker| combined.contains(marker));
    rejected.then_some(false)
}

/// Barretenberg proofs are sequences of 32-byte field elements.
fn check_proof_shape(proof: &[u8]) -> Result<(), BackendError> {
    if proof.is_empty() || proof.len() % FIELD_BYTES != 0 {
        return Err(BackendError::MalformedProof(format!(
            "{} bytes is not a whole number of field elements",
            proof.len()
        )));
    }
    Ok(())
}

fn encode_public_inputs(inputs: &PublicInputs) -> Vec<u8> {
    inputs.to_array().iter().flat_map(FieldElement::to_be_bytes).collect()
}

fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<FieldElement>, BackendError> {
    if bytes.len() % FIELD_BYTES != 0 {
        return Err(BackendError::MalformedProof(format!(
            "public inputs file of {} bytes",
            bytes.len()
        )));
    }
    bytes
        .chunks(FIELD_BYTES)
        .map(|chunk| {
            FieldElement::from_be_bytes(chunk)
                .map_err(|e| BackendError::MalformedProof(format!("public input: {e}")))
        })
        .collect()
}

fn prover_toml(inputs: &CircuitInputs) -> Result<String, BackendError> {
    toml::to_string(inputs).map_err(|e| BackendError::Execution {
        program: "Prover.toml".to_string(),
        reason: e.to_string(),
    })
}

async fn copy_dir(from: PathBuf, to: PathBuf) -> Result<(), BackendError> {
    tokio::task::spawn_blocking(move || copy_dir_blocking(&from, &to))
        .await
        .map_err(|e| BackendError::Io(std::io::Error::other(e)))??;
    Ok(())
}

fn copy_dir_blocking(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_blocking(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
