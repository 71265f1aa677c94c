//! vizkit - installer for a registry of chart components
//!
//! `vizkit add <namespace/category/name>` copies a chart component's source
//! file into the consuming project, follows its imports to pull in shared UI
//! and utility files, and installs the third-party packages it uses.
//!
//! # Architecture Overview
//!
//! The `add` command is a linear pipeline:
//!
//! 1. [`registry::ComponentRef`] parses and validates the identifier
//! 2. [`materializer::Materializer`] scaffolds directories and fetches the
//!    component file through a [`registry::RemoteStore`]
//! 3. [`scanner::ImportScanner`] extracts UI, utility and package dependencies
//! 4. The materializer fetches missing UI/utility files, best-effort
//! 5. [`packages::PackageInstaller`] installs all packages in one run
//! 6. [`report::Reporter`] prints status lines and a usage hint
//!
//! Only an invalid identifier, a scaffolding failure or a failure to fetch the
//! component file itself is fatal.
//!
//! # Registry Layout
//!
//! Remote and local trees mirror each other:
//!
//! ```text
//! <registry>/components/<namespace>/<category>/<name>.tsx   <root>/components/<namespace>/<category>/<name>.tsx
//! <registry>/ui/<name>.tsx                                  <root>/ui/<name>.tsx
//! <registry>/utils/<name>.ts                                <root>/utils/<name>.ts
//! ```
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line parsing and the `add` command
//! - [`config`] - Layered global/project configuration
//! - [`core`] - Error types and user-facing error rendering
//! - [`materializer`] - Directory scaffolding and file fetching
//! - [`packages`] - Package manager detection and invocation
//! - [`registry`] - Identifiers, addresses and the registry client
//! - [`report`] - The `add` pipeline and its output
//! - [`scanner`] - Import scanning
//! - [`utils`] - Filesystem, naming and progress helpers

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod materializer;
pub mod packages;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
