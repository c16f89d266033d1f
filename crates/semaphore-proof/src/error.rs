//! # Orchestrator Errors
//!
//! Failures are detected in a fixed order: validation, then artifact
//! resolution, then backend invocation. A proof that the backend examined
//! and rejected is not an error; it is `Ok(false)`.

use semaphore_artifacts::ArtifactError;
use semaphore_backend::BackendError;
use semaphore_core::ValidationError;
use thiserror::Error;

/// A proof operation could not complete.
#[derive(Error, Debug)]
pub enum ProofError {
    /// Inputs were rejected before any artifact lookup.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// No usable circuit for the declared depth.
    #[error("artifact resolution failed: {0}")]
    ArtifactResolution(#[from] ArtifactError),

    /// The backend failed to load, verify or prove.
    #[error("backend failure: {0}")]
    Backend(#[from] BackendError),

    /// The backend produced outputs inconsistent with the request.
    #[error("proof generation failed: {0}")]
    Generation(String),
}

impl ProofError {
    /// The offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation(e) => Some(e.field()),
            _ => None,
        }
    }
}
