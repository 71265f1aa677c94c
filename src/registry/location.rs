//! Remote addresses and their local mirrors.
//!
//! Every file the registry serves lives under one of three subtrees, and the
//! project-local root mirrors the same structure:
//!
//! ```text
//! <base>/components/<namespace>/<category>/<name>.tsx   <root>/components/<namespace>/<category>/<name>.tsx
//! <base>/ui/<name>.tsx                                  <root>/ui/<name>.tsx
//! <base>/utils/<name>.ts                                <root>/utils/<name>.ts
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{COMPONENT_EXT, COMPONENTS_DIR, UI_DIR, UTIL_EXT, UTILS_DIR};
use crate::registry::ComponentRef;

/// Kind of registry file, which fixes its subtree and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A distributable component.
    Component,
    /// A shared UI file imported as `@/viz/ui/<name>`.
    Ui,
    /// A shared utility file imported as `@/viz/utils/<name>`.
    Util,
}

impl FileKind {
    /// File extension for this kind, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Component | Self::Ui => COMPONENT_EXT,
            Self::Util => UTIL_EXT,
        }
    }

    /// Short tag used in logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Ui => "ui",
            Self::Util => "util",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-qualified address of one file in the remote content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    relative_path: String,
    url: String,
}

impl RemoteLocation {
    /// Address of a component's own file.
    #[must_use]
    pub fn component(base_url: &str, component: &ComponentRef) -> Self {
        let relative_path = format!(
            "{COMPONENTS_DIR}/{}/{}/{}.{}",
            component.namespace(),
            component.category(),
            component.name(),
            FileKind::Component.extension()
        );
        Self::new(base_url, relative_path)
    }

    /// Address of a shared UI or utility file.
    ///
    /// `kind` is expected to be [`FileKind::Ui`] or [`FileKind::Util`];
    /// components are addressed through [`RemoteLocation::component`].
    #[must_use]
    pub fn dependency(base_url: &str, kind: FileKind, name: &str) -> Self {
        let dir = match kind {
            FileKind::Util => UTILS_DIR,
            FileKind::Ui | FileKind::Component => UI_DIR,
        };
        let relative_path = format!("{dir}/{name}.{}", kind.extension());
        Self::new(base_url, relative_path)
    }

    fn new(base_url: &str, relative_path: String) -> Self {
        let url = format!("{}/{relative_path}", base_url.trim_end_matches('/'));
        Self { relative_path, url }
    }

    /// Path relative to the registry base, always `/`-separated.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// The full address including the base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// The project-local directory tree files are materialized into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLayout {
    root: PathBuf,
}

impl LocalLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the given component.
    #[must_use]
    pub fn component_dir(&self, component: &ComponentRef) -> PathBuf {
        self.root
            .join(COMPONENTS_DIR)
            .join(component.namespace())
            .join(component.category())
    }

    /// Directory holding shared UI files.
    #[must_use]
    pub fn ui_dir(&self) -> PathBuf {
        self.root.join(UI_DIR)
    }

    /// Directory holding shared utility files.
    #[must_use]
    pub fn utils_dir(&self) -> PathBuf {
        self.root.join(UTILS_DIR)
    }

    /// The four directories every `add` ensures exist.
    #[must_use]
    pub fn scaffold_dirs(&self, component: &ComponentRef) -> [PathBuf; 4] {
        [self.root.clone(), self.component_dir(component), self.ui_dir(), self.utils_dir()]
    }

    /// Local path mirroring a remote location.
    #[must_use]
    pub fn target(&self, location: &RemoteLocation) -> PathBuf {
        location
            .relative_path()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}
