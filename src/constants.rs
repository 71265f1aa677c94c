//! Global constants used throughout the vizkit codebase.
//!
//! Registry layout conventions, network timeouts, and retry parameters live
//! here so the magic values are discoverable in one place.

use std::time::Duration;

/// Default registry base address.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.vizkit.dev/r";

/// Default project-local root, relative to the project directory.
pub const DEFAULT_ROOT_DIR: &str = "src/viz";

/// File extension of component markup files (components and shared UI).
pub const COMPONENT_EXT: &str = "tsx";

/// File extension of plain logic files (shared utilities).
pub const UTIL_EXT: &str = "ts";

/// Import alias prefix reserved for the consuming project's own sources.
///
/// Any specifier starting with this prefix is never an external package.
pub const ALIAS_PREFIX: &str = "@/";

/// Alias root under which registry-provided files are imported.
pub const ALIAS_ROOT: &str = "@/viz";

/// Subdirectory holding components, both remotely and locally.
pub const COMPONENTS_DIR: &str = "components";

/// Subdirectory holding shared UI files.
pub const UI_DIR: &str = "ui";

/// Subdirectory holding shared utility files.
pub const UTILS_DIR: &str = "utils";

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = "vizkit.toml";

/// Default timeout for a single registry request (30 seconds).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for establishing a connection to the registry (10 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts for a registry request hitting transport errors.
pub const DEFAULT_FETCH_ATTEMPTS: usize = 3;

/// Maximum backoff delay between fetch retries (500ms).
pub const MAX_BACKOFF_DELAY_MS: u64 = 500;

/// Starting delay for exponential backoff between fetch retries (10ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 10;
