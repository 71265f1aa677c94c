//! Core types shared across vizkit: the error taxonomy and its display helpers.

pub mod error;

pub use error::{ErrorContext, VizkitError, user_friendly_error};
