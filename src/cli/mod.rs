//! Command-line interface for vizkit.
//!
//! The CLI has a single working subcommand today:
//!
//! ```bash
//! # Add a component, its shared UI/utility files and its packages
//! vizkit add recharts/generic/timeseries-line-v1
//!
//! # Point at a different registry and skip package installation
//! vizkit add plot/maps/choropleth --registry file:///srv/registry --no-install
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: only warnings and errors
//! - `--no-progress`: disable spinners
//! - `--config` / `-c`: custom global configuration file
//!
//! Global options are applied once through [`CliConfig`] before the
//! subcommand runs.

pub mod add;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::utils::progress::NO_PROGRESS_ENV;

/// Process-wide settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive; `None` leaves logging to `RUST_LOG`.
    pub log_level: Option<String>,

    /// Disable spinners. Sets `VIZKIT_NO_PROGRESS`.
    pub no_progress: bool,

    /// Suppress status output.
    pub quiet: bool,

    /// Explicit global configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Configuration with every option at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply process-wide state: the progress switch and the log subscriber.
    ///
    /// Must run before any other thread reads the environment.
    pub fn apply(&self) {
        if self.no_progress {
            // SAFETY: called once at startup before any spawned work reads the environment.
            unsafe {
                std::env::set_var(NO_PROGRESS_ENV, "1");
            }
        }
        self.init_logging();
    }

    fn init_logging(&self) {
        let filter = if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // Status output comes from the reporter; tracing stays silent.
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }
}

/// Component installer for the vizkit chart registry.
#[derive(Parser, Debug)]
#[command(
    name = "vizkit",
    about = "Add chart components from the vizkit registry to your project",
    version,
    long_about = "vizkit copies chart component sources, their shared UI and utility files, \
                  and their npm packages into your project."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a custom global configuration file
    ///
    /// Defaults to `~/.vizkit/config.toml`, or `VIZKIT_CONFIG` when set.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable progress spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a component and its dependencies to the current project
    Add(add::AddCommand),
}

impl Cli {
    /// Run the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Derive the process-wide configuration from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run with an explicit configuration, so tests can skip flag parsing.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply();

        match self.command {
            Commands::Add(cmd) => cmd.execute(&config).await,
        }
    }
}
