//! Error handling for vizkit
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell fatal failures from advisory ones
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`VizkitError`] - Enumerated error types for every failure in the `add` flow
//! - [`ErrorContext`] - Wrapper adding details and a suggestion for display
//!
//! Only [`VizkitError::InvalidIdentifier`], [`VizkitError::PrimaryFetchFailed`]
//! and scaffolding errors abort a run. [`VizkitError::DependencyFetchFailed`] and
//! [`VizkitError::PackageInstallFailed`] are produced for reporting and logged
//! as warnings; they never reach `main`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vizkit_cli::core::{VizkitError, user_friendly_error};
//!
//! let err = VizkitError::InvalidIdentifier {
//!     input: "recharts/line".to_string(),
//!     reason: "expected 3 segments, found 2".to_string(),
//! };
//! user_friendly_error(anyhow::Error::from(err)).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for vizkit operations.
#[derive(Error, Debug, Clone)]
pub enum VizkitError {
    /// The component reference is not of the form `namespace/category/name`.
    #[error("Invalid component identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The raw user input
        input: String,
        /// Why the input was rejected
        reason: String,
    },

    /// The component file itself could not be retrieved.
    #[error("Failed to download component '{component}' from {url}: {reason}")]
    PrimaryFetchFailed {
        /// The component identifier
        component: String,
        /// The address that was requested
        url: String,
        /// Status or transport failure description
        reason: String,
    },

    /// A shared UI or utility file could not be retrieved.
    #[error("Failed to download {kind} dependency '{name}' from {url}: {reason}")]
    DependencyFetchFailed {
        /// `ui` or `util`
        kind: String,
        /// Dependency name as imported
        name: String,
        /// The address that was requested
        url: String,
        /// Status or transport failure description
        reason: String,
    },

    /// The external package installer failed or could not be started.
    #[error("Package installation failed: {reason}")]
    PackageInstallFailed {
        /// The exact command line the user can re-run
        command: String,
        /// Exit status or spawn failure description
        reason: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// A filesystem operation failed on a known path.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation being performed
        operation: String,
        /// The path involved
        path: String,
    },

    /// Permission was denied on a known path.
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied {
        /// The operation being performed
        operation: String,
        /// The path involved
        path: String,
    },

    /// Catch-all for errors without a dedicated variant.
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

/// Error wrapper with user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: VizkitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: VizkitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Walks the `anyhow` chain looking for a [`VizkitError`] first, then for
/// I/O errors, and falls back to the full chain as a plain message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // Also matches a VizkitError attached with `.context(...)`.
    if let Some(vizkit_error) = error.downcast_ref::<VizkitError>() {
        let ctx = create_error_context(vizkit_error.clone());
        return match vizkit_error {
            VizkitError::FileSystemError { .. } => ctx.with_details(error.root_cause().to_string()),
            _ => ctx,
        };
    }

    for cause in error.chain() {
        if let Some(vizkit_error) = cause.downcast_ref::<VizkitError>() {
            return create_error_context(vizkit_error.clone());
        }
    }

    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::PermissionDenied {
                return ErrorContext::new(VizkitError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_details(format!("{error:#}"))
                .with_suggestion("Check ownership and permissions of the project directory");
            }
        }
    }

    ErrorContext::new(VizkitError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: VizkitError) -> ErrorContext {
    match &error {
        VizkitError::InvalidIdentifier { .. } => ErrorContext::new(error)
            .with_details("Components are addressed as namespace/category/name")
            .with_suggestion("Try something like: vizkit add recharts/generic/timeseries-line-v1"),
        VizkitError::PrimaryFetchFailed { .. } => ErrorContext::new(error)
            .with_details("No component file was written to the project")
            .with_suggestion(
                "Check the component name and the registry address (--registry or VIZKIT_REGISTRY_URL)",
            ),
        VizkitError::PackageInstallFailed { command, .. } => {
            let suggestion = format!("Run the command manually: {command}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        VizkitError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the syntax of vizkit.toml and ~/.vizkit/config.toml"),
        VizkitError::FileSystemError { .. } | VizkitError::PermissionDenied { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Check that the path is writable and is not a regular file")
        }
        _ => ErrorContext::new(error),
    }
}
