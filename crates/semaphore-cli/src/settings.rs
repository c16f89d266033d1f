//! # Shared Command Settings
//!
//! Global flags are layered over [`SemaphoreConfig::from_env`]: a flag, when
//! given, wins over its environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use semaphore_artifacts::{CachedResolver, FsArtifactResolver};
use semaphore_backend::MockEngine;
use semaphore_proof::{Semaphore, SemaphoreConfig, SemaphoreProof};

/// Which proving engine to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Barretenberg via the `bb` and `nargo` executables.
    Bb,
    /// Deterministic mock proofs. No zero-knowledge, no soundness.
    Mock,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Root of the circuit artifact tree [env: SEMAPHORE_ARTIFACTS_DIR].
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Circuit project name [env: SEMAPHORE_PROJECT].
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Proving engine.
    #[arg(long, global = true, value_enum, default_value_t = BackendKind::Bb)]
    pub backend: BackendKind,

    /// Barretenberg executable [env: SEMAPHORE_BB_BIN].
    #[arg(long, global = true, value_name = "PATH")]
    pub bb_bin: Option<PathBuf>,

    /// Nargo executable [env: SEMAPHORE_NARGO_BIN].
    #[arg(long, global = true, value_name = "PATH")]
    pub nargo_bin: Option<PathBuf>,

    /// Backend worker threads [env: SEMAPHORE_BB_THREADS].
    #[arg(long, global = true)]
    pub threads: Option<usize>,
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Effective configuration.
    pub config: SemaphoreConfig,
    /// Selected engine.
    pub backend: BackendKind,
}

impl Settings {
    /// Apply `args` over the environment configuration.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let mut config = SemaphoreConfig::from_env().context("invalid environment configuration")?;
        Self::apply(&mut config, args);
        Ok(Self {
            config,
            backend: args.backend,
        })
    }

    fn apply(config: &mut SemaphoreConfig, args: &GlobalArgs) {
        if let Some(dir) = &args.artifacts_dir {
            config.artifacts_dir = dir.clone();
        }
        if let Some(project) = &args.project {
            config.project = project.clone();
        }
        if let Some(bb) = &args.bb_bin {
            config.bb_bin = bb.clone();
        }
        if let Some(nargo) = &args.nargo_bin {
            config.nargo_bin = nargo.clone();
        }
        if let Some(threads) = args.threads.filter(|n| *n > 0) {
            config.threads = threads;
        }
    }

    /// An orchestrator over the configured artifact tree and the mock engine.
    pub fn mock_semaphore(&self) -> Semaphore<CachedResolver<FsArtifactResolver>, MockEngine> {
        Semaphore::new(
            CachedResolver::new(FsArtifactResolver::new(&self.config.artifacts_dir)),
            MockEngine,
        )
        .with_project(&self.config.project)
        .with_options(self.config.backend_options())
    }
}

/// Read a JSON proof record from `path`.
pub fn read_proof(path: &Path) -> Result<SemaphoreProof> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    SemaphoreProof::from_json_str(&content)
        .with_context(|| format!("invalid proof record: {}", path.display()))
}

/// Write `content` to `out`, or to stdout when `out` is `None`.
pub fn write_output(out: Option<&Path>, content: &[u8]) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write file: {}", path.display())),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content)?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
