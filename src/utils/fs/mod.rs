//! File system utilities.
//!
//! - [`dirs`] - idempotent directory creation
//! - [`atomic`] - temp-and-rename writes that never leave partial files

pub mod atomic;
pub mod dirs;

pub use atomic::atomic_write;
pub use dirs::{ensure_dir, ensure_parent_dir};
