//! # semaphore-core — Foundational Types for Semaphore Proofs
//!
//! This crate holds everything about a Semaphore proof that can be decided
//! without touching the filesystem or a proving backend. Every other crate
//! in the workspace depends on `semaphore-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Field elements are a type, not a string.** [`FieldElement`] wraps a
//!    BN254 scalar and can only be constructed in range. Decimal and hex
//!    strings are parsed once, at the boundary.
//!
//! 2. **One domain hash.** [`hash`] is the only path from a scope or message
//!    to its public-input value. Proof generation and verification share it.
//!
//! 3. **Public-input order lives in one place.** [`PublicInputs::to_array`]
//!    returns `[hash(scope), hash(message), root, nullifier]`. Nothing else
//!    assembles the vector.
//!
//! 4. **Validation is pure and happens first.** [`validate`] turns an
//!    untrusted [`SemaphoreProof`] into a [`ValidatedProof`] or names the
//!    offending `proof.<field>`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `semaphore-*` crates.
//! - No I/O, no async, no `unsafe`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod constants;
pub mod error;
pub mod field;
pub mod hash;
pub mod pack;
pub mod proof;
pub mod public_inputs;
pub mod signal;
pub mod validate;
pub mod witness;

// Re-export primary types for ergonomic imports.
pub use constants::{is_supported_depth, MAX_DEPTH, MIN_DEPTH, PUBLIC_INPUT_COUNT};
pub use error::{FieldError, PackError, SignalError, ValidationError};
pub use field::{scalar_modulus, FieldElement};
pub use hash::{hash, hash_str, keccak256};
pub use pack::{pack_proof, unpack_proof, PackedProof, PACKED_PROOF_VERSION};
pub use proof::SemaphoreProof;
pub use public_inputs::PublicInputs;
pub use signal::{Signal, MAX_TEXT_SIGNAL_BYTES};
pub use validate::{validate, ValidatedProof};
pub use witness::{generate_inputs, resolve_depth, CircuitInputs, Group, Identity, Membership, MerkleProof};
