//! # Artifact Resolvers
//!
//! [`ArtifactResolver`] maps a `(project, depth)` key to a compiled circuit.
//! Resolution is deterministic: the same key always yields the same
//! artifact, and a depth without an artifact is
//! [`ArtifactError::NotFound`], never the artifact of another depth.
//!
//! ## Filesystem layout
//!
//! ```text
//! {root}/{project}/{project}-{depth}.json   compiled circuit (required)
//! {root}/{project}/{project}-{depth}.vk     verification key (optional)
//! {root}/{project}/src-{depth}/             Noir program (optional)
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::artifact::{check_compiled_circuit, CircuitArtifact};
use crate::error::ArtifactError;

/// Source of compiled circuits.
pub trait ArtifactResolver: Send + Sync {
    /// Resolve the artifact for `project` at `depth`.
    fn resolve(
        &self,
        project: &str,
        depth: u32,
    ) -> impl Future<Output = Result<Arc<CircuitArtifact>, ArtifactError>> + Send;
}

impl<R: ArtifactResolver> ArtifactResolver for Arc<R> {
    fn resolve(
        &self,
        project: &str,
        depth: u32,
    ) -> impl Future<Output = Result<Arc<CircuitArtifact>, ArtifactError>> + Send {
        (**self).resolve(project, depth)
    }
}

/// Reads artifacts from a local directory tree. Never writes.
#[derive(Debug, Clone)]
pub struct FsArtifactResolver {
    root: PathBuf,
}

impl FsArtifactResolver {
    /// A resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the compiled circuit for a key.
    pub fn circuit_path(&self, project: &str, depth: u32) -> PathBuf {
        self.root.join(project).join(format!("{project}-{depth}.json"))
    }

    /// Path of the verification key for a key.
    pub fn vk_path(&self, project: &str, depth: u32) -> PathBuf {
        self.root.join(project).join(format!("{project}-{depth}.vk"))
    }

    /// Path of the Noir program directory for a key.
    pub fn source_dir(&self, project: &str, depth: u32) -> PathBuf {
        self.root.join(project).join(format!("src-{depth}"))
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, ArtifactError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl ArtifactResolver for FsArtifactResolver {
    async fn resolve(
        &self,
        project: &str,
        depth: u32,
    ) -> Result<Arc<CircuitArtifact>, ArtifactError> {
        let circuit_path = self.circuit_path(project, depth);
        let bytecode = read_optional(&circuit_path)
            .await?
            .ok_or_else(|| ArtifactError::NotFound {
                project: project.to_string(),
                depth,
            })?;
        check_compiled_circuit(&bytecode).map_err(|reason| ArtifactError::Corrupt {
            path: circuit_path.clone(),
            reason,
        })?;

        let vk_path = self.vk_path(project, depth);
        let verification_key = read_optional(&vk_path).await?;
        if verification_key.as_ref().is_some_and(Vec::is_empty) {
            return Err(ArtifactError::Corrupt {
                path: vk_path,
                reason: "empty verification key".to_string(),
            });
        }

        let source_dir = self.source_dir(project, depth);
        let source_dir = tokio::fs::metadata(&source_dir)
            .await
            .ok()
            .filter(|m| m.is_dir())
            .map(|_| source_dir);

        tracing::debug!(
            project,
            depth,
            path = %circuit_path.display(),
            has_vk = verification_key.is_some(),
            has_source = source_dir.is_some(),
            "loaded circuit artifact"
        );

        Ok(Arc::new(CircuitArtifact {
            project: project.to_string(),
            depth,
            bytecode,
            verification_key,
            source_dir,
        }))
    }
}

/// Serves artifacts registered in memory, keyed by `(project, depth)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    artifacts: HashMap<(String, u32), Arc<CircuitArtifact>>,
}

impl MemoryResolver {
    /// An empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact under its own project and depth.
    pub fn insert(&mut self, artifact: CircuitArtifact) {
        self.artifacts.insert(
            (artifact.project.clone(), artifact.depth),
            Arc::new(artifact),
        );
    }

    /// Builder form of [`MemoryResolver::insert`].
    pub fn with(mut self, artifact: CircuitArtifact) -> Self {
        self.insert(artifact);
        self
    }
}

impl ArtifactResolver for MemoryResolver {
    async fn resolve(
        &self,
        project: &str,
        depth: u32,
    ) -> Result<Arc<CircuitArtifact>, ArtifactError> {
        self.artifacts
            .get(&(project.to_string(), depth))
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                project: project.to_string(),
                depth,
            })
    }
}
