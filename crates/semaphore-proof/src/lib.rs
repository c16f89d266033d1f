//! # semaphore-proof — Proof Orchestration
//!
//! The public entry point for generating and verifying Semaphore proofs.
//! [`Semaphore`] sequences validation, artifact resolution, hashing, input
//! assembly and backend invocation for one operation at a time; many
//! operations may run concurrently over one instance.
//!
//! ```text
//! verify:   validate → resolve(depth) → hash(scope), hash(message)
//!           → [hash(scope), hash(message), root, nullifier] → backend.verify
//! generate: membership path → resolve(depth) → witness → backend.prove
//!           → SemaphoreProof
//! ```
//!
//! The pure pieces ([`generate_inputs`], [`pack_proof`], [`unpack_proof`],
//! [`hash`]) are re-exported from `semaphore-core` so callers need only this
//! crate.
//!
//! ## Crate Policy
//!
//! - No backend or resolver is hard-wired; both are injected.
//! - `verify_proof` returns `Ok(false)` only for proofs the backend
//!   rejected.

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{ConfigError, SemaphoreConfig, DEFAULT_PROJECT};
pub use error::ProofError;
pub use orchestrator::{Semaphore, Stage};

pub use semaphore_core::{
    generate_inputs, hash, pack_proof, unpack_proof, CircuitInputs, FieldElement, Group, Identity,
    Membership, MerkleProof, PackError, SemaphoreProof, Signal, ValidationError, MAX_DEPTH,
    MIN_DEPTH,
};
