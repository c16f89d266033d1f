//! # Artifact Errors

use std::path::PathBuf;

use thiserror::Error;

/// A circuit artifact could not be produced for a `(project, depth)` key.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// No artifact exists for this depth. Resolvers never fall back to a
    /// neighbouring depth.
    #[error("no circuit artifact for project {project:?} at depth {depth}")]
    NotFound {
        /// Circuit project name.
        project: String,
        /// Requested tree depth.
        depth: u32,
    },

    /// The artifact exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact was read but is not a usable compiled circuit.
    #[error("corrupt circuit artifact {}: {reason}", path.display())]
    Corrupt {
        /// File that failed.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}
