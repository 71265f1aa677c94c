//! Cross-cutting utilities: filesystem helpers, progress output, and
//! identifier formatting.

pub mod fs;
pub mod naming;
pub mod progress;
