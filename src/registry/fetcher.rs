//! Retrieval of registry files.
//!
//! [`RemoteStore`] is the seam between resolution logic and the network.
//! [`RegistryClient`] is the production implementation: it speaks HTTP(S)
//! through `reqwest`, or reads a local mirror when the base address is a
//! `file://` URL. Tests substitute an in-memory store.
//!
//! Only a `200 OK` response counts as success. Transport failures (connection
//! errors, timeouts) and `5xx` responses are retried with exponential backoff;
//! any other status fails immediately.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};
use url::Url;

use crate::config::RegistryConfig;
use crate::constants::{CONNECT_TIMEOUT, MAX_BACKOFF_DELAY_MS, STARTING_BACKOFF_DELAY_MS};
use crate::registry::RemoteLocation;
use crate::utils::fs::atomic_write;

/// Why a single fetch failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The store answered with something other than `200 OK`.
    #[error("HTTP {status}")]
    Status {
        /// The status code received
        status: u16,
    },

    /// A `file://` registry has no such file.
    #[error("not found: {path}")]
    NotFound {
        /// The local path that was looked up
        path: String,
    },

    /// The request never produced a response (connection error, timeout, read error).
    #[error("transport error: {reason}")]
    Transport {
        /// Description of the failure
        reason: String,
    },

    /// The content was fetched but could not be written locally.
    #[error("failed to write {path}: {reason}")]
    Write {
        /// The destination path
        path: String,
        /// Description of the failure
        reason: String,
    },
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status } => *status >= 500,
            Self::NotFound { .. } | Self::Write { .. } => false,
        }
    }
}

/// A source of registry file content.
pub trait RemoteStore {
    /// Retrieve the raw bytes at `location`.
    fn fetch(
        &self,
        location: &RemoteLocation,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Fetch `location` and write it verbatim to `target`.
///
/// Parent directories are created as needed. The write goes through a
/// temporary file, so on failure nothing is left at `target`. Returns the
/// fetched bytes so callers can scan them without re-reading the file.
pub async fn fetch_to<S>(
    store: &S,
    location: &RemoteLocation,
    target: &Path,
) -> Result<Vec<u8>, FetchError>
where
    S: RemoteStore + ?Sized,
{
    let bytes = store.fetch(location).await?;
    atomic_write(target, &bytes).map_err(|e| FetchError::Write {
        path: target.display().to_string(),
        reason: format!("{e:#}"),
    })?;
    debug!(target: "fetch", "Wrote {} bytes to {}", bytes.len(), target.display());
    Ok(bytes)
}

#[derive(Debug, Clone)]
enum Backend {
    Http(reqwest::Client),
    File(PathBuf),
}

/// Production [`RemoteStore`] backed by HTTP(S) or a local `file://` mirror.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    backend: Backend,
    attempts: usize,
}

impl RegistryClient {
    /// Build a client for the configured registry.
    ///
    /// # Errors
    ///
    /// Fails if the registry address is not a valid `http`, `https` or `file`
    /// URL, or the HTTP client cannot be constructed.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let url = Url::parse(&config.registry_url)
            .with_context(|| format!("Invalid registry URL: {}", config.registry_url))?;

        let backend = match url.scheme() {
            "http" | "https" => {
                let client = reqwest::Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .timeout(config.timeout)
                    .user_agent(concat!("vizkit/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .context("Failed to build HTTP client")?;
                Backend::Http(client)
            }
            "file" => {
                let root = url.to_file_path().map_err(|()| {
                    anyhow::anyhow!("Registry file URL has no local path: {}", config.registry_url)
                })?;
                Backend::File(root)
            }
            other => anyhow::bail!("Unsupported registry URL scheme '{other}'"),
        };

        Ok(Self {
            backend,
            attempts: config.attempts.max(1),
        })
    }

    async fn fetch_once(&self, location: &RemoteLocation) -> Result<Vec<u8>, FetchError> {
        match &self.backend {
            Backend::Http(client) => fetch_http(client, location).await,
            Backend::File(root) => fetch_file(root, location).await,
        }
    }
}

impl RemoteStore for RegistryClient {
    async fn fetch(&self, location: &RemoteLocation) -> Result<Vec<u8>, FetchError> {
        debug!(target: "fetch", "Fetching {}", location.url());

        let strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .factor(2)
            .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
            .take(self.attempts - 1);

        // Only retryable failures surface as `Err` to the retry loop; the
        // rest are carried through as a successful attempt and unwrapped below.
        Retry::spawn(strategy, || async {
            match self.fetch_once(location).await {
                Err(e) if e.is_retryable() => {
                    warn!(target: "fetch", "Attempt for {} failed: {}", location.url(), e);
                    Err(e)
                }
                other => Ok(other),
            }
        })
        .await
        .and_then(|result| result)
    }
}

async fn fetch_http(
    client: &reqwest::Client,
    location: &RemoteLocation,
) -> Result<Vec<u8>, FetchError> {
    let response = client.get(location.url()).send().await.map_err(|e| transport(&e))?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!(target: "fetch", "{} answered {}", location.url(), status);
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|e| transport(&e))?;
    Ok(body.to_vec())
}

async fn fetch_file(root: &Path, location: &RemoteLocation) -> Result<Vec<u8>, FetchError> {
    let path = location
        .relative_path()
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment));

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(FetchError::Transport {
            reason: format!("{}: {e}", path.display()),
        }),
    }
}

fn transport(error: &reqwest::Error) -> FetchError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };
    FetchError::Transport { reason }
}
