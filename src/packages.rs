//! Installation of external packages discovered in component sources.
//!
//! The installer is invoked at most once per `add`, with every package
//! appended to the package manager's install command. Its standard streams
//! are inherited so interactive output reaches the user unchanged.
//!
//! [`PackageInstaller`] is the seam tests use to swap in a recording fake.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::VizkitError;

/// Supported JavaScript package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// `npm install <packages>`
    Npm,
    /// `pnpm add <packages>`
    Pnpm,
    /// `yarn add <packages>`
    Yarn,
    /// `bun add <packages>`
    Bun,
}

impl PackageManager {
    /// Pick the package manager whose lockfile is present in `project_dir`,
    /// falling back to npm.
    #[must_use]
    pub fn detect(project_dir: &Path) -> Self {
        let lockfiles: [(&str, Self); 4] = [
            ("pnpm-lock.yaml", Self::Pnpm),
            ("yarn.lock", Self::Yarn),
            ("bun.lockb", Self::Bun),
            ("bun.lock", Self::Bun),
        ];

        for (lockfile, manager) in lockfiles {
            if project_dir.join(lockfile).is_file() {
                debug!(target: "install", "Found {lockfile}, using {manager}");
                return manager;
            }
        }
        Self::Npm
    }

    /// Executable name.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Subcommand that adds packages to the project.
    #[must_use]
    pub const fn install_subcommand(self) -> &'static str {
        match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Capability to install a set of external packages.
pub trait PackageInstaller {
    /// The command line that installs `packages`, for display and manual re-runs.
    fn command_line(&self, packages: &[String]) -> String;

    /// Install `packages`.
    ///
    /// # Errors
    ///
    /// Returns [`VizkitError::PackageInstallFailed`] carrying the exact
    /// command line when the installer cannot be started or exits non-zero.
    fn install(&self, packages: &[String]) -> impl Future<Output = Result<(), VizkitError>> + Send;
}

/// [`PackageInstaller`] that spawns a real package manager process.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandInstaller {
    /// Installer for a known package manager, run from `working_dir`.
    pub fn new(manager: PackageManager, working_dir: impl Into<PathBuf>) -> Self {
        Self::custom(manager.program(), [manager.install_subcommand()], working_dir)
    }

    /// Installer running an arbitrary program with leading arguments.
    pub fn custom<I, S>(program: impl Into<String>, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
        }
    }
}

impl PackageInstaller for CommandInstaller {
    fn command_line(&self, packages: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(packages.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn install(&self, packages: &[String]) -> Result<(), VizkitError> {
        let command_line = self.command_line(packages);
        let failed = |reason: String| VizkitError::PackageInstallFailed {
            command: command_line.clone(),
            reason,
        };

        // Resolves `npm.cmd` and friends on Windows.
        let program = which::which(&self.program)
            .map_err(|_| failed(format!("'{}' was not found on PATH", self.program)))?;

        info!(target: "install", "Executing: {command_line}");
        let status = Command::new(program)
            .args(&self.args)
            .args(packages)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| failed(format!("failed to start: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(failed(match status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_from_lockfiles() {
        let temp = tempdir().unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Npm);

        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Yarn);

        fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Pnpm);
    }

    #[test]
    fn test_detect_bun_text_lockfile() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bun.lock"), "{}").unwrap();
        assert_eq!(PackageManager::detect(temp.path()), PackageManager::Bun);
    }

    #[test]
    fn test_command_line() {
        let installer = CommandInstaller::new(PackageManager::Npm, ".");
        let packages = vec!["recharts".to_string(), "@observablehq/plot".to_string()];
        assert_eq!(installer.command_line(&packages), "npm install recharts @observablehq/plot");

        let installer = CommandInstaller::new(PackageManager::Pnpm, ".");
        assert_eq!(installer.command_line(&packages[..1]), "pnpm add recharts");
    }

    #[tokio::test]
    async fn test_missing_program_reports_command() {
        let installer =
            CommandInstaller::custom("vizkit-definitely-missing-installer", ["add"], ".");
        let err = installer.install(&["d3".to_string()]).await.unwrap_err();
        match err {
            VizkitError::PackageInstallFailed { command, reason } => {
                assert_eq!(command, "vizkit-definitely-missing-installer add d3");
                assert!(reason.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_reports_exit_status() {
        let temp = tempdir().unwrap();
        let installer = CommandInstaller::custom("false", Vec::<String>::new(), temp.path());
        let err = installer.install(&["d3".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_program() {
        let temp = tempdir().unwrap();
        let installer = CommandInstaller::custom("true", Vec::<String>::new(), temp.path());
        installer.install(&["d3".to_string()]).await.unwrap();
    }
}
