//! Parsing of `namespace/category/name` component references.

use std::fmt;
use std::str::FromStr;

use crate::core::VizkitError;

/// Address of one component in the registry.
///
/// Constructed once from user input and read-only afterwards. All three
/// segments are guaranteed non-empty and free of path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    namespace: String,
    category: String,
    name: String,
}

impl ComponentRef {
    /// Parse a reference of the form `namespace/category/name`.
    ///
    /// Surrounding whitespace is ignored. Anything other than exactly three
    /// non-empty segments is rejected, as are `.`/`..` segments and
    /// backslashes, so the reference can never address a file outside the
    /// components subtree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vizkit_cli::registry::ComponentRef;
    ///
    /// let component = ComponentRef::parse("recharts/generic/timeseries-line-v1").unwrap();
    /// assert_eq!(component.namespace(), "recharts");
    /// assert_eq!(component.category(), "generic");
    /// assert_eq!(component.name(), "timeseries-line-v1");
    ///
    /// assert!(ComponentRef::parse("recharts/timeseries-line-v1").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`VizkitError::InvalidIdentifier`] when the input does not have
    /// the expected shape.
    pub fn parse(input: &str) -> Result<Self, VizkitError> {
        let invalid = |reason: String| VizkitError::InvalidIdentifier {
            input: input.to_string(),
            reason,
        };

        let segments: Vec<&str> = input.trim().split('/').collect();
        if segments.len() != 3 {
            return Err(invalid(format!(
                "expected 3 segments (namespace/category/name), found {}",
                segments.len()
            )));
        }

        for (label, segment) in ["namespace", "category", "name"].iter().zip(&segments) {
            if segment.is_empty() {
                return Err(invalid(format!("{label} is empty")));
            }
            if *segment == "." || *segment == ".." || segment.contains('\\') {
                return Err(invalid(format!("{label} '{segment}' is not a valid path segment")));
            }
        }

        Ok(Self {
            namespace: segments[0].to_string(),
            category: segments[1].to_string(),
            name: segments[2].to_string(),
        })
    }

    /// The registry namespace, usually the charting library (`recharts`, `plot`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The category within the namespace.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The component's file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ComponentRef {
    type Err = VizkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.category, self.name)
    }
}
