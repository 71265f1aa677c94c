//! Atomic file write operations using a temp-and-rename strategy.
//!
//! Downloads are written to a temporary file next to the destination and
//! renamed into place only once fully written, so an interrupted or failed
//! write never leaves a partial file at the destination.

use crate::utils::fs::dirs::ensure_parent_dir;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Atomically writes bytes to a file.
///
/// 1. Creates parent directories if needed
/// 2. Writes to a uniquely-named temporary file in the same directory
/// 3. Syncs the temporary file to disk
/// 4. Renames it over the target path
///
/// On any failure the temporary file is removed (it is dropped before the
/// rename) and the destination is left untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use vizkit_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("src/viz/utils/format.ts"), b"export const f = 1;\n")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".vizkit-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
