//! Addressing and retrieval of registry files.
//!
//! - [`component_ref`] - parsing `namespace/category/name` references
//! - [`location`] - remote addresses and their local mirrors
//! - [`fetcher`] - the [`RemoteStore`] seam and its HTTP/`file://` client

pub mod component_ref;
pub mod fetcher;
pub mod location;

pub use component_ref::ComponentRef;
pub use fetcher::{FetchError, RegistryClient, RemoteStore, fetch_to};
pub use location::{FileKind, LocalLayout, RemoteLocation};
