//! config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. `GITHUB_PERSONAL_TOKEN` environment variable (token only)
//! 4. CLI flags
//!
//! # Config File Locations
//!
//! Searched in order, first hit wins:
//! 1. `./rebrand.toml`
//! 2. `<config_dir>/rebrand/config.toml`
//!
//! Missing files are not an error; defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Organization migrated from when nothing else is configured.
pub const DEFAULT_SOURCE_ORG: &str = "bio-tools";

/// Organization migrated into when nothing else is configured.
pub const DEFAULT_TARGET_ORG: &str = "bio-agents";

/// Account granted admin on each published repository by default.
/// Configure an empty string to grant nobody.
pub const DEFAULT_COLLABORATOR: &str = "chenxingqiang";

/// Directory that holds per-repository workspaces by default.
pub const DEFAULT_WORK_DIR: &str = "./";

/// Environment variable consulted for the access token.
pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_TOKEN";

/// Config file looked for in the working directory.
const LOCAL_CONFIG_FILE: &str = "rebrand.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Access token for the forge.
    pub token: Option<String>,
    /// Organization to migrate from.
    pub source_org: Option<String>,
    /// Organization to migrate into.
    pub target_org: Option<String>,
    /// Directory that holds per-repository workspaces.
    pub work_dir: Option<PathBuf>,
    /// Account granted admin on each published repository.
    pub collaborator: Option<String>,
}

impl FileConfig {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::read(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("rebrand/config.toml");
            if path.exists() {
                return Self::read(&path);
            }
        }

        Ok(Self::default())
    }

    /// Read and parse a config file.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// CLI flag values layered on top of file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub source_org: Option<String>,
    pub target_org: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub collaborator: Option<String>,
}

/// Fully resolved settings for a run.
#[derive(Clone)]
pub struct Settings {
    /// Access token for the forge, if any source supplied one.
    pub token: Option<String>,
    /// Organization to migrate from.
    pub source_org: String,
    /// Organization to migrate into.
    pub target_org: String,
    /// Directory that holds per-repository workspaces.
    pub work_dir: PathBuf,
    /// Account granted admin on each published repository.
    pub collaborator: Option<String>,
}

// Manual Debug to avoid leaking the token.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("has_token", &self.token.is_some())
            .field("source_org", &self.source_org)
            .field("target_org", &self.target_org)
            .field("work_dir", &self.work_dir)
            .field("collaborator", &self.collaborator)
            .finish()
    }
}

impl Settings {
    /// Resolve settings from all sources with standard precedence.
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = FileConfig::load()?;
        let env_token = std::env::var(TOKEN_ENV).ok();
        Ok(Self::resolve_with(overrides, env_token, file))
    }

    /// Pure resolution over already-gathered sources.
    pub fn resolve_with(overrides: &Overrides, env_token: Option<String>, file: FileConfig) -> Self {
        let token = overrides
            .token
            .clone()
            .or(env_token)
            .or(file.token)
            .filter(|t| !t.is_empty());

        let collaborator = overrides
            .collaborator
            .clone()
            .or(file.collaborator)
            .unwrap_or_else(|| DEFAULT_COLLABORATOR.to_string());

        Self {
            token,
            source_org: overrides
                .source_org
                .clone()
                .or(file.source_org)
                .unwrap_or_else(|| DEFAULT_SOURCE_ORG.to_string()),
            target_org: overrides
                .target_org
                .clone()
                .or(file.target_org)
                .unwrap_or_else(|| DEFAULT_TARGET_ORG.to_string()),
            work_dir: overrides
                .work_dir
                .clone()
                .or(file.work_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR)),
            collaborator: Some(collaborator).filter(|c| !c.is_empty()),
        }
    }
}
