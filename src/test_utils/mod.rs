//! Test utilities for vizkit
//!
//! Fakes for the two external seams, plus logging setup:
//!
//! - [`MemoryStore`] - an in-memory [`RemoteStore`] that records every request
//! - [`RecordingInstaller`] - a [`PackageInstaller`] that records its calls
//! - [`init_test_logging`] - one-time tracing setup honoring `RUST_LOG`
//!
//! # Example
//!
//! ```rust,no_run
//! use vizkit_cli::materializer::Materializer;
//! use vizkit_cli::registry::LocalLayout;
//! use vizkit_cli::test_utils::MemoryStore;
//!
//! let store = MemoryStore::new().with_file("ui/legend.tsx", "export {}");
//! let materializer = Materializer::new(store, "https://registry.test", LocalLayout::new("/tmp/viz"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once, PoisonError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::VizkitError;
use crate::packages::PackageInstaller;
use crate::registry::{FetchError, RemoteLocation, RemoteStore};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging
/// stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// In-memory registry keyed by relative path (`ui/legend.tsx`).
///
/// Missing files answer with HTTP 404. Files registered through
/// [`MemoryStore::with_failure`] answer with the given error instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
    failures: HashMap<String, FetchError>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` at `path`.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.insert(path.to_string(), content.as_ref().to_vec());
        self
    }

    /// Stop serving `path`.
    #[must_use]
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Answer requests for `path` with `error`.
    #[must_use]
    pub fn with_failure(mut self, path: &str, error: FetchError) -> Self {
        self.failures.insert(path.to_string(), error);
        self
    }

    /// Relative paths requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl RemoteStore for MemoryStore {
    async fn fetch(&self, location: &RemoteLocation) -> Result<Vec<u8>, FetchError> {
        let path = location.relative_path();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());

        if let Some(error) = self.failures.get(path) {
            return Err(error.clone());
        }
        self.files.get(path).cloned().ok_or(FetchError::Status { status: 404 })
    }
}

/// [`PackageInstaller`] that records each call instead of spawning a process.
///
/// Its command line is `fake-pm add <packages>`.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    fail: bool,
}

impl RecordingInstaller {
    /// An installer whose calls succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An installer whose calls fail with a non-zero exit.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Package lists passed to each call.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PackageInstaller for RecordingInstaller {
    fn command_line(&self, packages: &[String]) -> String {
        format!("fake-pm add {}", packages.join(" "))
    }

    async fn install(&self, packages: &[String]) -> Result<(), VizkitError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(packages.to_vec());

        if self.fail {
            Err(VizkitError::PackageInstallFailed {
                command: self.command_line(packages),
                reason: "exited with status 1".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
