//! reqgate configuration.
//!
//! Precedence: built-in defaults < JSON config file (`--config` or
//! `REQGATE_CONFIG`) < command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the witness ledger location.
pub const WITNESS_ENV: &str = "REQGATE_WITNESS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Every requirement must carry a trailing license comment.
    pub require_license: bool,
    /// Do not report duplicate package names.
    pub allow_duplicates: bool,
    /// Witness ledger location (overridden by `REQGATE_WITNESS`).
    pub witness_path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Witness ledger path: `REQGATE_WITNESS` env, then config, then
    /// `~/.reqgate/witness.jsonl`.
    pub fn witness_path(&self) -> PathBuf {
        self.witness_path_with(std::env::var_os(WITNESS_ENV).map(PathBuf::from))
    }

    fn witness_path_with(&self, env_override: Option<PathBuf>) -> PathBuf {
        if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
            return path;
        }
        if let Some(path) = &self.witness_path {
            return path.clone();
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reqgate")
            .join("witness.jsonl")
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
    #[cfg(windows)]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}
