//! # Circuit Artifacts
//!
//! A [`CircuitArtifact`] is the compiled membership circuit for one tree
//! depth: the Noir compiler's JSON output (which carries the ACIR bytecode),
//! optionally a verification key, and optionally the Noir program directory
//! needed to execute a witness out-of-process.
//!
//! Artifacts are identified in logs and by the mock backend through the
//! SHA-256 digest of their bytecode.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// A compiled circuit for one `(project, depth)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitArtifact {
    /// Circuit project name, e.g. `semaphore-noir`.
    pub project: String,
    /// Tree depth the circuit was compiled for.
    pub depth: u32,
    /// Contents of the compiled circuit file.
    pub bytecode: Vec<u8>,
    /// Verification key, when shipped alongside the circuit.
    pub verification_key: Option<Vec<u8>>,
    /// Noir program directory, for witness execution.
    pub source_dir: Option<PathBuf>,
}

impl CircuitArtifact {
    /// An artifact with bytecode only.
    pub fn new(project: impl Into<String>, depth: u32, bytecode: Vec<u8>) -> Self {
        Self {
            project: project.into(),
            depth,
            bytecode,
            verification_key: None,
            source_dir: None,
        }
    }

    /// SHA-256 of the bytecode.
    pub fn digest(&self) -> [u8; 32] {
        let hash = Sha256::digest(&self.bytecode);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        out
    }

    /// SHA-256 of the bytecode as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// Check that `bytes` look like compiled Noir output: a JSON object with a
/// non-empty string `bytecode` member.
pub(crate) fn check_compiled_circuit(bytes: &[u8]) -> Result<(), String> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| format!("not a JSON document: {e}"))?;
    match value.get("bytecode").and_then(serde_json::Value::as_str) {
        Some(b) if !b.is_empty() => Ok(()),
        Some(_) => Err("empty bytecode".to_string()),
        None => Err("missing string member `bytecode`".to_string()),
    }
}
