//! Materialization of a component and its local dependency files.
//!
//! The file half of `add` runs in two calls:
//!
//! 1. [`Materializer::scaffold`] creates the root, component, `ui` and
//!    `utils` directories and reports which ones are new
//! 2. [`Materializer::materialize`] **fetches the component file** (failure
//!    here aborts the whole operation), **scans** it for dependencies and
//!    **fetches UI and utility files** that are not already present,
//!    best-effort
//!
//! Dependency files already on disk are authoritative and are never
//! re-fetched or overwritten. Only the component's own imports are followed;
//! dependency files are not scanned in turn.
//!
//! The best-effort dependency fetches run concurrently, but their outcomes are
//! returned in discovery order (UI names first, then utilities).

use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::core::VizkitError;
use crate::registry::{
    ComponentRef, FetchError, FileKind, LocalLayout, RemoteLocation, RemoteStore, fetch_to,
};
use crate::scanner::{DependencySet, ImportScanner};
use crate::utils::fs::ensure_dir;

/// Result of materializing one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The file was fetched and written.
    Downloaded,
    /// The file already existed locally and was left alone.
    Skipped,
    /// The fetch failed; the run continues.
    Failed(String),
}

/// Outcome for one local dependency file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// `Ui` or `Util`.
    pub kind: FileKind,
    /// Dependency name as imported.
    pub name: String,
    /// Address it was (or would have been) fetched from.
    pub url: String,
    /// Local destination.
    pub path: PathBuf,
    /// What happened.
    pub outcome: InstallOutcome,
}

impl FileOutcome {
    /// The advisory error for a failed file, if any.
    #[must_use]
    pub fn error(&self) -> Option<VizkitError> {
        match &self.outcome {
            InstallOutcome::Failed(reason) => Some(VizkitError::DependencyFetchFailed {
                kind: self.kind.to_string(),
                name: self.name.clone(),
                url: self.url.clone(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

/// Everything the file half of `add` produced.
#[derive(Debug, Clone)]
pub struct Materialized {
    /// Where the component file was written.
    pub component_path: PathBuf,
    /// Dependencies found in the component source.
    pub dependencies: DependencySet,
    /// Per-file outcomes for UI then utility dependencies.
    pub files: Vec<FileOutcome>,
}

impl Materialized {
    /// Number of dependency files that failed to download.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, InstallOutcome::Failed(_)))
            .count()
    }
}

/// Pulls a component and its local dependencies from a [`RemoteStore`].
#[derive(Debug)]
pub struct Materializer<S> {
    store: S,
    base_url: String,
    layout: LocalLayout,
    scanner: ImportScanner,
}

impl<S: RemoteStore> Materializer<S> {
    /// Create a materializer writing under `layout` and addressing files
    /// relative to `base_url`.
    pub fn new(store: S, base_url: impl Into<String>, layout: LocalLayout) -> Result<Self> {
        Ok(Self {
            store,
            base_url: base_url.into(),
            layout,
            scanner: ImportScanner::new().context("Failed to compile import patterns")?,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the directories `component` needs, returning those that did
    /// not exist before.
    ///
    /// # Errors
    ///
    /// [`VizkitError::FileSystemError`] when a directory cannot be created.
    pub fn scaffold(&self, component: &ComponentRef) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in self.layout.scaffold_dirs(component) {
            let was_created = ensure_dir(&dir).map_err(|e| {
                e.context(VizkitError::FileSystemError {
                    operation: "create directory".to_string(),
                    path: dir.display().to_string(),
                })
            })?;
            if was_created {
                debug!("Created {}", dir.display());
                created.push(dir);
            }
        }
        Ok(created)
    }

    /// Fetch `component` and its UI/utility dependencies into the layout.
    ///
    /// Call [`Materializer::scaffold`] first; parent directories of written
    /// files are created on demand but not reported.
    ///
    /// # Errors
    ///
    /// - [`VizkitError::PrimaryFetchFailed`] when the component file cannot be
    ///   fetched or written; no scanning happens and no component file is left
    ///
    /// Dependency fetch failures are never errors; they are recorded as
    /// [`InstallOutcome::Failed`].
    pub async fn materialize(&self, component: &ComponentRef) -> Result<Materialized> {
        let location = RemoteLocation::component(&self.base_url, component);
        let component_path = self.layout.target(&location);
        info!("Downloading {} from {}", component, location.url());

        let bytes = fetch_to(&self.store, &location, &component_path).await.map_err(|e| {
            VizkitError::PrimaryFetchFailed {
                component: component.to_string(),
                url: location.url().to_string(),
                reason: e.to_string(),
            }
        })?;

        let source = String::from_utf8_lossy(&bytes);
        let dependencies = self.scanner.scan(&source);
        debug!(
            "{} imports ui={:?} utils={:?} packages={:?}",
            component, dependencies.ui, dependencies.utils, dependencies.packages
        );

        let requests = dependencies
            .ui
            .iter()
            .map(|name| (FileKind::Ui, name))
            .chain(dependencies.utils.iter().map(|name| (FileKind::Util, name)));
        let files = join_all(requests.map(|(kind, name)| self.fetch_dependency(kind, name))).await;

        Ok(Materialized {
            component_path,
            dependencies,
            files,
        })
    }

    async fn fetch_dependency(&self, kind: FileKind, name: &str) -> FileOutcome {
        let location = RemoteLocation::dependency(&self.base_url, kind, name);
        let path = self.layout.target(&location);

        let outcome = if path.exists() {
            debug!("{} dependency '{}' already present at {}", kind, name, path.display());
            InstallOutcome::Skipped
        } else {
            match fetch_to(&self.store, &location, &path).await {
                Ok(_) => InstallOutcome::Downloaded,
                Err(e) => {
                    warn!("Failed to fetch {} dependency '{}' from {}: {}", kind, name, location.url(), e);
                    InstallOutcome::Failed(describe(&e))
                }
            }
        };

        FileOutcome {
            kind,
            name: name.to_string(),
            url: location.url().to_string(),
            path,
            outcome,
        }
    }
}

fn describe(error: &FetchError) -> String {
    match error {
        FetchError::Status { status: 404 } => "not found in registry (HTTP 404)".to_string(),
        other => other.to_string(),
    }
}
