//! # semaphore-artifacts — Circuit Artifact Resolution
//!
//! The membership circuit is compiled once per supported tree depth. This
//! crate maps a declared depth to its compiled artifact:
//!
//! - [`ArtifactResolver`]: the async contract, keyed by `(project, depth)`.
//! - [`FsArtifactResolver`]: reads a local, read-only artifact tree.
//! - [`MemoryResolver`]: artifacts registered in memory.
//! - [`CachedResolver`]: per-key memoization safe for concurrent callers.
//!
//! Downloading artifacts is not this crate's concern; the filesystem
//! resolver expects them to be present already.
//!
//! ## Crate Policy
//!
//! - No internal dependencies.
//! - A missing depth is always an error, never a nearest-depth fallback.

pub mod artifact;
pub mod cache;
pub mod error;
pub mod resolver;

pub use artifact::CircuitArtifact;
pub use cache::CachedResolver;
pub use error::ArtifactError;
pub use resolver::{ArtifactResolver, FsArtifactResolver, MemoryResolver};
