//! Orchestrator configuration.
//!
//! Locates circuit artifacts and proving executables. Defaults suit a local
//! checkout with `bb` and `nargo` on `PATH`; override via environment
//! variables or explicit construction.

use std::path::PathBuf;

use semaphore_backend::{BackendOptions, OracleHash};

/// Default circuit project.
pub const DEFAULT_PROJECT: &str = "semaphore-noir";

/// Where artifacts and executables live, and how the backend runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemaphoreConfig {
    /// Root of the artifact tree.
    pub artifacts_dir: PathBuf,
    /// Circuit project name.
    pub project: String,
    /// Barretenberg executable.
    pub bb_bin: PathBuf,
    /// Nargo executable.
    pub nargo_bin: PathBuf,
    /// Backend worker threads.
    pub threads: usize,
}

impl Default for SemaphoreConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("./artifacts"),
            project: DEFAULT_PROJECT.to_string(),
            bb_bin: PathBuf::from("bb"),
            nargo_bin: PathBuf::from("nargo"),
            threads: 1,
        }
    }
}

impl SemaphoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SEMAPHORE_ARTIFACTS_DIR` (default: `./artifacts`)
    /// - `SEMAPHORE_PROJECT` (default: `semaphore-noir`)
    /// - `SEMAPHORE_BB_BIN` (default: `bb`)
    /// - `SEMAPHORE_NARGO_BIN` (default: `nargo`)
    /// - `SEMAPHORE_BB_THREADS` (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| -> Result<Option<String>, ConfigError> {
            match lookup(var) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(var.to_string())),
                other => Ok(other),
            }
        };

        let threads = match get("SEMAPHORE_BB_THREADS")? {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidThreads(raw)),
            },
            None => defaults.threads,
        };

        Ok(Self {
            artifacts_dir: get("SEMAPHORE_ARTIFACTS_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),
            project: get("SEMAPHORE_PROJECT")?.unwrap_or(defaults.project),
            bb_bin: get("SEMAPHORE_BB_BIN")?
                .map(PathBuf::from)
                .unwrap_or(defaults.bb_bin),
            nargo_bin: get("SEMAPHORE_NARGO_BIN")?
                .map(PathBuf::from)
                .unwrap_or(defaults.nargo_bin),
            threads,
        })
    }

    /// Backend options derived from this configuration. The oracle hash is
    /// always keccak.
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            oracle_hash: OracleHash::Keccak,
            threads: self.threads,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The named variable is set to an empty or blank value.
    #[error("{0} is set but empty")]
    Empty(String),
    /// `SEMAPHORE_BB_THREADS` is not a positive integer.
    #[error("SEMAPHORE_BB_THREADS must be a positive integer, got {0:?}")]
    InvalidThreads(String),
}
