//! Directory creation helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// Returns `Ok(true)` when the directory was created and `Ok(false)` when it
/// already existed, so callers can report what they did. Calling this on an
/// existing directory is a no-op.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use vizkit_cli::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let created = ensure_dir(Path::new("src/viz/ui"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    if path.exists() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }

    fs::create_dir_all(path).with_context(|| {
        format!(
            "Failed to create directory: {}\n\nCheck directory permissions and path validity",
            path.display()
        )
    })?;
    Ok(true)
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent (bare file names) are left alone.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}
