//! `vizkit add` - add a component to the current project.
//!
//! The identifier is validated before anything touches the filesystem or
//! network. Settings are then resolved from the configuration layers and
//! flags, and the work is handed to [`add_component`].
//!
//! # Examples
//!
//! ```bash
//! vizkit add recharts/generic/timeseries-line-v1
//! vizkit add plot/maps/choropleth --package-manager pnpm
//! vizkit add recharts/generic/bar --root app/charts --no-install
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::CliConfig;
use crate::config::{ConfigOverrides, Settings};
use crate::materializer::Materializer;
use crate::packages::{CommandInstaller, PackageManager};
use crate::registry::{ComponentRef, LocalLayout, RegistryClient};
use crate::report::{AddOptions, Reporter, add_component};

/// Arguments for `vizkit add`.
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Component to add, as `namespace/category/name`
    component: String,

    /// Registry base URL (`http`, `https` or `file`)
    #[arg(long, env = "VIZKIT_REGISTRY_URL")]
    registry: Option<String>,

    /// Directory the registry tree is mirrored into, relative to the project
    #[arg(long)]
    root: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Package manager used to install external packages
    #[arg(long, value_enum)]
    package_manager: Option<PackageManager>,

    /// Print the install command instead of running it
    #[arg(long)]
    no_install: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl AddCommand {
    /// Execute the command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let component = ComponentRef::parse(&self.component)?;

        let project_dir = match self.cwd {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let overrides = ConfigOverrides {
            config_path: config.config_path.clone(),
            registry_url: self.registry,
            root: self.root,
            timeout_secs: self.timeout,
            package_manager: self.package_manager,
        };
        let settings = Settings::resolve(&project_dir, &overrides)?;
        debug!("Resolved settings: {settings:?}");

        let client = RegistryClient::new(&settings.registry)?;
        let materializer = Materializer::new(
            client,
            settings.registry.registry_url.clone(),
            LocalLayout::new(&settings.root),
        )?;

        let manager = settings
            .package_manager
            .unwrap_or_else(|| PackageManager::detect(&settings.project_dir));
        let installer = CommandInstaller::new(manager, &settings.project_dir);

        let reporter = Reporter::new(config.quiet, &settings.project_dir);
        let options = AddOptions { install: !self.no_install };

        add_component(&component, &materializer, &installer, options, &reporter).await?;
        Ok(())
    }
}
