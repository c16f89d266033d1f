//! # Proving Engine Traits
//!
//! Defines the abstract interface between the orchestrator and a proving
//! system. All engines (Barretenberg CLI, mock, test fakes) satisfy these
//! traits, so the orchestrator never names a concrete backend.
//!
//! Loading a circuit ([`ProvingEngine::load`]) is the expensive step and
//! yields a [`BackendInstance`] bound to one artifact. The orchestrator
//! creates one instance per operation and drops it afterwards.
//!
//! ## Security Invariant
//!
//! `verify` distinguishes two outcomes that must never be conflated:
//! `Ok(false)` means the backend ran and rejected the proof; `Err(_)` means
//! the backend could not reach a verdict. Implementations must not map
//! load or execution failures to `Ok(false)`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use semaphore_artifacts::CircuitArtifact;
use semaphore_core::{CircuitInputs, FieldElement, PublicInputs};
use thiserror::Error;

/// Hash used for the Fiat-Shamir transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleHash {
    /// Keccak-256, matching the domain hash and EVM verifiers.
    #[default]
    Keccak,
    /// Poseidon2, for recursive verification.
    Poseidon2,
}

impl OracleHash {
    /// The name Barretenberg uses for this hash.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keccak => "keccak",
            Self::Poseidon2 => "poseidon2",
        }
    }
}

impl fmt::Display for OracleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options fixed when a circuit is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendOptions {
    /// Transcript hash. Proofs only verify under the hash they were made with.
    pub oracle_hash: OracleHash,
    /// Worker threads the backend may use.
    pub threads: usize,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            oracle_hash: OracleHash::Keccak,
            threads: 1,
        }
    }
}

/// A proof and the public inputs the circuit produced for it, in circuit
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofData {
    /// Backend-encoded proof.
    pub proof: Vec<u8>,
    /// Public inputs: parameters first, then return values.
    pub public_inputs: Vec<FieldElement>,
}

/// The backend could not reach a verdict or produce a proof.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The circuit could not be loaded.
    #[error("failed to load circuit: {0}")]
    Load(String),

    /// The proof bytes are not a proof this backend can read.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// An external program or the proving system failed.
    #[error("{program} failed: {reason}")]
    Execution {
        /// What failed, e.g. `bb prove`.
        program: String,
        /// Exit status and diagnostics.
        reason: String,
    },

    /// Filesystem error while staging inputs or reading outputs.
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation needs something this engine or artifact lacks.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// A proving system able to load compiled circuits.
pub trait ProvingEngine: Send + Sync {
    /// A loaded circuit.
    type Instance: BackendInstance;

    /// Load `artifact`. This is the expensive step.
    fn load(
        &self,
        artifact: Arc<CircuitArtifact>,
        options: &BackendOptions,
    ) -> impl Future<Output = Result<Self::Instance, BackendError>> + Send;
}

/// A circuit loaded into a proving system.
pub trait BackendInstance: Send + Sync {
    /// Check `proof` against `public_inputs`.
    ///
    /// The inputs are passed by name; the instance lays them out with
    /// [`PublicInputs::to_array`].
    fn verify(
        &self,
        proof: &[u8],
        public_inputs: &PublicInputs,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Execute the circuit on `inputs` and prove the execution.
    fn prove(
        &self,
        inputs: &CircuitInputs,
    ) -> impl Future<Output = Result<ProofData, BackendError>> + Send;
}
