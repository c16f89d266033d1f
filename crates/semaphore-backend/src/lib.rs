//! # semaphore-backend — Proving Backends
//!
//! Wraps proving systems behind a small contract so the orchestrator can
//! load a circuit, verify against a public-input vector, and prove a witness
//! without knowing which system does the work.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`ProvingEngine`] loads a
//!   [`CircuitArtifact`](semaphore_artifacts::CircuitArtifact) into a
//!   [`BackendInstance`], which verifies and proves. Both traits are open so
//!   callers can inject their own engines.
//!
//! - **Barretenberg** (`bb.rs`): [`BbCliEngine`] shells out to `bb` and
//!   `nargo` with the keccak oracle hash.
//!
//! - **Mock** (`mock.rs`, feature `mock`): [`MockEngine`] evaluates the
//!   circuit relations directly and issues transparent keccak-bound proofs.
//!
//! ## Crate Policy
//!
//! - Depends on `semaphore-core` and `semaphore-artifacts` internally.
//! - A backend that cannot reach a verdict returns an error, never `false`.

pub mod bb;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use bb::{BbCliEngine, BbCliInstance};
#[cfg(feature = "mock")]
pub use mock::{mock_commitment, mock_identity, mock_node_hash, MockEngine, MockGroup, MockInstance};
pub use traits::{BackendError, BackendInstance, BackendOptions, OracleHash, ProofData, ProvingEngine};
