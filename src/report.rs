//! The `add` pipeline and its user-facing report.
//!
//! [`add_component`] ties the materializer and the package installer
//! together: files first, then a single installer run once every fetch has
//! settled. Each step is announced through a [`Reporter`] as it happens, and
//! the complete outcome is returned as an [`AddReport`].

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::{ALIAS_ROOT, COMPONENTS_DIR};
use crate::core::VizkitError;
use crate::materializer::{InstallOutcome, Materialized, Materializer};
use crate::packages::PackageInstaller;
use crate::registry::{ComponentRef, RemoteStore};
use crate::utils::naming::pascal_case;
use crate::utils::progress::Spinner;

/// Knobs for a single `add` run.
#[derive(Debug, Clone, Copy)]
pub struct AddOptions {
    /// Run the package installer; when `false` the command is only printed.
    pub install: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self { install: true }
    }
}

/// What happened to the external packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// The component imports no external packages.
    NotNeeded,
    /// The installer ran and succeeded.
    Installed {
        /// Command line that was run
        command: String,
    },
    /// Installation was disabled for this run.
    Skipped {
        /// Command line the user can run instead
        command: String,
    },
    /// The installer failed or could not be started.
    Failed {
        /// Command line the user can re-run
        command: String,
        /// Why it failed
        reason: String,
    },
}

/// Full outcome of one `add` invocation.
#[derive(Debug, Clone)]
pub struct AddReport {
    /// The component that was added.
    pub component: ComponentRef,
    /// Directories that did not exist before this run.
    pub created_dirs: Vec<PathBuf>,
    /// Files and dependencies.
    pub materialized: Materialized,
    /// Package installation result.
    pub packages: PackageOutcome,
}

impl AddReport {
    /// Whether any advisory step failed.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.materialized.failed_count() > 0 || matches!(self.packages, PackageOutcome::Failed { .. })
    }
}

/// Add `component` to the project: files, then packages.
///
/// # Errors
///
/// Only fatal failures are returned (scaffolding and the component file
/// itself). Created directories are reported before the component fetch,
/// so they show up even when that fetch fails. Dependency and installer failures end up in the report.
pub async fn add_component<S, I>(
    component: &ComponentRef,
    materializer: &Materializer<S>,
    installer: &I,
    options: AddOptions,
    reporter: &Reporter,
) -> Result<AddReport>
where
    S: RemoteStore,
    I: PackageInstaller,
{
    let created_dirs = materializer.scaffold(component)?;
    reporter.created(&created_dirs);

    let spinner = Spinner::new(format!("Downloading {component}"));
    let materialized = materializer.materialize(component).await;
    spinner.finish_and_clear();
    let materialized = materialized?;

    reporter.materialized(component, &materialized);

    let packages = &materialized.dependencies.packages;
    let packages = if packages.is_empty() {
        PackageOutcome::NotNeeded
    } else {
        let command = installer.command_line(packages);
        if options.install {
            reporter.installing(&command);
            match installer.install(packages).await {
                Ok(()) => PackageOutcome::Installed { command },
                Err(e) => {
                    warn!(target: "install", "{e}");
                    let reason = match e {
                        VizkitError::PackageInstallFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    PackageOutcome::Failed { command, reason }
                }
            }
        } else {
            PackageOutcome::Skipped { command }
        }
    };

    reporter.packages(&packages);
    reporter.usage(component);

    Ok(AddReport {
        component: component.clone(),
        created_dirs,
        materialized,
        packages,
    })
}

/// The import line a consumer would write for `component`.
#[must_use]
pub fn usage_hint(component: &ComponentRef) -> String {
    format!(
        "import {{ {} }} from \"{ALIAS_ROOT}/{COMPONENTS_DIR}/{}/{}/{}\"",
        pascal_case(component.name()),
        component.namespace(),
        component.category(),
        component.name()
    )
}

/// Prints status lines for the `add` pipeline.
///
/// Progress goes to stdout and is suppressed by `quiet`; warnings always go
/// to stderr. Paths are shown relative to `base_dir` when possible.
#[derive(Debug, Clone)]
pub struct Reporter {
    quiet: bool,
    base_dir: PathBuf,
}

impl Reporter {
    /// Create a reporter; `base_dir` is usually the project directory.
    pub fn new(quiet: bool, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            quiet,
            base_dir: base_dir.into(),
        }
    }

    /// A reporter that prints nothing but warnings.
    #[must_use]
    pub fn quiet() -> Self {
        Self::new(true, PathBuf::new())
    }

    fn display<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.base_dir).unwrap_or(path).display()
    }

    fn status(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    fn warning(&self, line: impl AsRef<str>) {
        eprintln!("{} {}", "⚠️  Warning:".yellow().bold(), line.as_ref());
    }

    fn created(&self, dirs: &[PathBuf]) {
        for dir in dirs {
            self.status(format!("  {} {}", "Created".cyan(), self.display(dir)));
        }
    }

    fn materialized(&self, component: &ComponentRef, materialized: &Materialized) {
        self.status(format!(
            "{} {} → {}",
            "✓ Downloaded".green(),
            component,
            self.display(&materialized.component_path)
        ));

        for file in &materialized.files {
            match &file.outcome {
                InstallOutcome::Downloaded => self.status(format!(
                    "{} {} {}",
                    "✓ Downloaded".green(),
                    file.kind,
                    file.name
                )),
                InstallOutcome::Skipped => self.status(format!(
                    "{} {} {} (already present at {})",
                    "↷ Skipped".dimmed(),
                    file.kind,
                    file.name,
                    self.display(&file.path)
                )),
                InstallOutcome::Failed(_) => {
                    if let Some(error) = file.error() {
                        self.warning(error.to_string());
                    }
                }
            }
        }
    }

    fn installing(&self, command: &str) {
        self.status(format!("{} {}", "Installing packages:".cyan(), command));
    }

    fn packages(&self, outcome: &PackageOutcome) {
        match outcome {
            PackageOutcome::NotNeeded => {}
            PackageOutcome::Installed { .. } => {
                self.status(format!("{}", "✓ Installed packages".green()));
            }
            PackageOutcome::Skipped { command } => {
                self.status(format!("Skipped package installation. Run manually:\n  {command}"));
            }
            PackageOutcome::Failed { command, reason } => self.warning(format!(
                "Package installation failed: {reason}\n  Run manually: {command}"
            )),
        }
    }

    fn usage(&self, component: &ComponentRef) {
        self.status(format!("\n{}", format!("Added {component}").green().bold()));
        self.status(format!("  {}", usage_hint(component)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LocalLayout;
    use crate::test_utils::{MemoryStore, RecordingInstaller};
    use tempfile::tempdir;

    const BASE: &str = "https://registry.test";

    fn component() -> ComponentRef {
        ComponentRef::parse("recharts/generic/timeseries-line-v1").unwrap()
    }

    fn store(source: &str) -> MemoryStore {
        MemoryStore::new()
            .with_file("components/recharts/generic/timeseries-line-v1.tsx", source)
            .with_file("ui/chart-card.tsx", "export {}")
    }

    #[test]
    fn test_usage_hint() {
        assert_eq!(
            usage_hint(&component()),
            "import { TimeseriesLineV1 } from \"@/viz/components/recharts/generic/timeseries-line-v1\""
        );
    }

    #[tokio::test]
    async fn test_installer_runs_once_with_all_packages() {
        let temp = tempdir().unwrap();
        let source = r#"
import { ChartCard } from "@/viz/ui/chart-card";
import { LineChart } from "recharts";
import * as Plot from "@observablehq/plot";
import { scaleTime } from "d3-scale/src/time";
"#;
        let materializer =
            Materializer::new(store(source), BASE, LocalLayout::new(temp.path())).unwrap();
        let installer = RecordingInstaller::new();

        let report = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(
            installer.calls(),
            vec![vec![
                "recharts".to_string(),
                "@observablehq/plot".to_string(),
                "d3-scale".to_string()
            ]]
        );
        assert!(matches!(report.packages, PackageOutcome::Installed { .. }));
        assert!(!report.has_warnings());
    }

    #[tokio::test]
    async fn test_installer_skipped_without_packages() {
        let temp = tempdir().unwrap();
        let materializer = Materializer::new(
            store(r#"import { ChartCard } from "@/viz/ui/chart-card";"#),
            BASE,
            LocalLayout::new(temp.path()),
        )
        .unwrap();
        let installer = RecordingInstaller::new();

        let report = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        assert!(installer.calls().is_empty());
        assert_eq!(report.packages, PackageOutcome::NotNeeded);
    }

    #[tokio::test]
    async fn test_install_failure_is_advisory() {
        let temp = tempdir().unwrap();
        let materializer =
            Materializer::new(store(r#"import "recharts";"#), BASE, LocalLayout::new(temp.path()))
                .unwrap();
        let installer = RecordingInstaller::failing();

        let report = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        match &report.packages {
            PackageOutcome::Failed { command, .. } => assert_eq!(command, "fake-pm add recharts"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.has_warnings());
    }

    #[tokio::test]
    async fn test_no_install_only_reports_command() {
        let temp = tempdir().unwrap();
        let materializer =
            Materializer::new(store(r#"import "recharts";"#), BASE, LocalLayout::new(temp.path()))
                .unwrap();
        let installer = RecordingInstaller::new();

        let report = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions { install: false },
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        assert!(installer.calls().is_empty());
        assert_eq!(
            report.packages,
            PackageOutcome::Skipped { command: "fake-pm add recharts".to_string() }
        );
    }

    #[tokio::test]
    async fn test_primary_failure_skips_installer() {
        let temp = tempdir().unwrap();
        let materializer =
            Materializer::new(MemoryStore::new(), BASE, LocalLayout::new(temp.path())).unwrap();
        let installer = RecordingInstaller::new();

        let result = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await;

        assert!(result.is_err());
        assert!(installer.calls().is_empty());
        // Directories are in place (and were reported) before the failing fetch.
        assert!(LocalLayout::new(temp.path()).component_dir(&component()).is_dir());
    }

    #[tokio::test]
    async fn test_created_dirs_are_reported_once() {
        let temp = tempdir().unwrap();
        let layout = LocalLayout::new(temp.path().join("viz"));
        let materializer =
            Materializer::new(store(r#"import "recharts";"#), BASE, layout.clone()).unwrap();
        let installer = RecordingInstaller::new();

        let first = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();
        let second = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(first.created_dirs.len(), 4);
        assert_eq!(first.created_dirs[0].as_path(), layout.root());
        assert!(second.created_dirs.is_empty());
    }

    #[tokio::test]
    async fn test_dependency_failure_still_installs_packages() {
        let temp = tempdir().unwrap();
        let source = r#"
import { ChartCard } from "@/viz/ui/chart-card";
import { Legend } from "@/viz/ui/legend";
import { LineChart } from "recharts";
"#;
        // The store has chart-card but no legend.
        let materializer =
            Materializer::new(store(source), BASE, LocalLayout::new(temp.path())).unwrap();
        let installer = RecordingInstaller::new();

        let report = add_component(
            &component(),
            &materializer,
            &installer,
            AddOptions::default(),
            &Reporter::quiet(),
        )
        .await
        .unwrap();

        let legend = report.materialized.files.iter().find(|f| f.name == "legend").unwrap();
        assert!(matches!(legend.outcome, InstallOutcome::Failed(_)));
        assert_eq!(report.materialized.failed_count(), 1);
        assert_eq!(installer.calls(), vec![vec!["recharts".to_string()]]);
        assert!(matches!(report.packages, PackageOutcome::Installed { .. }));
        assert!(report.has_warnings());
    }
}
