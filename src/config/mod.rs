//! Configuration management for vizkit
//!
//! Settings are layered, each layer overriding the one before it:
//!
//! 1. Built-in defaults
//! 2. Global configuration (`~/.vizkit/config.toml`, or `--config` / `VIZKIT_CONFIG`)
//! 3. Project configuration (`vizkit.toml` in the project directory)
//! 4. Command-line flags and their environment variables
//!
//! The resolved [`Settings`] value is threaded explicitly into the fetcher
//! and materializer; nothing reads configuration from ambient state after
//! startup.
//!
//! # File Format
//!
//! Both files share the same keys, all optional:
//!
//! ```toml
//! registry_url = "https://registry.vizkit.dev/r"
//! root = "src/viz"
//! timeout_secs = 30
//! attempts = 3
//! package_manager = "pnpm"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_TIMEOUT, DEFAULT_REGISTRY_URL, DEFAULT_ROOT_DIR,
    PROJECT_CONFIG_FILE,
};
use crate::core::VizkitError;
use crate::packages::PackageManager;

/// Environment variable overriding the global configuration path.
pub const CONFIG_PATH_ENV: &str = "VIZKIT_CONFIG";

/// On-disk representation shared by the global and project files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base address of the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    /// Project-local root directory, relative to the project directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Total attempts per request when transport errors occur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,

    /// Package manager used to install external packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
}

impl ConfigFile {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            VizkitError::ConfigError {
                message: format!("{}: {}", path.display(), e.message()),
            }
            .into()
        })
    }

    /// Load a configuration file if it exists.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.is_file() {
            debug!("Loading config from {}", path.display());
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            registry_url: other.registry_url.or(self.registry_url),
            root: other.root.or(self.root),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            attempts: other.attempts.or(self.attempts),
            package_manager: other.package_manager.or(self.package_manager),
        }
    }

    /// Default location of the global configuration file.
    ///
    /// - **Unix/macOS**: `~/.vizkit/config.toml`
    /// - **Windows**: `%LOCALAPPDATA%\vizkit\config.toml`
    pub fn default_global_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("vizkit")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".vizkit")
        };

        Ok(config_dir.join("config.toml"))
    }
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit global configuration path.
    pub config_path: Option<PathBuf>,
    /// Registry base address.
    pub registry_url: Option<String>,
    /// Project-local root directory.
    pub root: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Package manager.
    pub package_manager: Option<PackageManager>,
}

impl ConfigOverrides {
    fn as_file(&self) -> ConfigFile {
        ConfigFile {
            registry_url: self.registry_url.clone(),
            root: self.root.clone(),
            timeout_secs: self.timeout_secs,
            attempts: None,
            package_manager: self.package_manager,
        }
    }
}

/// Everything the fetcher needs to reach the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Base address; `http`, `https` or `file` scheme.
    pub registry_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts per request, at least 1.
    pub attempts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory of the consuming project.
    pub project_dir: PathBuf,
    /// Absolute project-local root the registry tree is mirrored into.
    pub root: PathBuf,
    /// Registry access settings.
    pub registry: RegistryConfig,
    /// Explicitly configured package manager, if any.
    pub package_manager: Option<PackageManager>,
}

impl Settings {
    /// Resolve settings for `project_dir` from all configuration layers.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named global config is missing, any file is
    /// malformed, or a value is out of range.
    pub fn resolve(project_dir: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let global_path = overrides
            .config_path
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let global = match global_path {
            Some(path) => ConfigFile::load(&path)?,
            None => match ConfigFile::default_global_path() {
                Ok(path) => ConfigFile::load_optional(&path)?.unwrap_or_default(),
                Err(e) => {
                    debug!("Skipping global config: {e}");
                    ConfigFile::default()
                }
            },
        };

        let project =
            ConfigFile::load_optional(&project_dir.join(PROJECT_CONFIG_FILE))?.unwrap_or_default();

        Self::from_layers(project_dir, global.merge(project).merge(overrides.as_file()))
    }

    /// Build settings from an already-merged configuration.
    pub fn from_layers(project_dir: &Path, merged: ConfigFile) -> Result<Self> {
        let defaults = RegistryConfig::default();

        let timeout = match merged.timeout_secs {
            Some(0) => {
                return Err(VizkitError::ConfigError {
                    message: "timeout_secs must be greater than zero".to_string(),
                }
                .into());
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        let attempts = match merged.attempts {
            Some(0) => {
                return Err(VizkitError::ConfigError {
                    message: "attempts must be at least 1".to_string(),
                }
                .into());
            }
            Some(n) => n,
            None => defaults.attempts,
        };

        let root = merged.root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR));
        let root = if root.is_absolute() { root } else { project_dir.join(root) };

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            root,
            registry: RegistryConfig {
                registry_url: merged.registry_url.unwrap_or(defaults.registry_url),
                timeout,
                attempts,
            },
            package_manager: merged.package_manager,
        })
    }
}
