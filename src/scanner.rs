//! Import scanning for registry component sources.
//!
//! The scanner is deliberately textual: it only needs to understand the
//! static, top-level import statements the registry's own files use. Module
//! specifiers are pulled out of
//!
//! - `import ... from "<specifier>"` / `import type ... from "<specifier>"`
//! - `export ... from "<specifier>"`
//! - side-effect imports, `import "<specifier>"`
//!
//! and each specifier is then tested against three independent patterns:
//!
//! | Pattern  | Shape                         | Captured            |
//! |----------|-------------------------------|---------------------|
//! | UI       | `@/viz/ui/<name>`             | `<name>`            |
//! | Utility  | `@/viz/utils/<name>`          | `<name>`            |
//! | External | not `.`, `/` or `@/` prefixed | package root        |
//!
//! Dynamic `import()` expressions and `require()` calls never match.
//! Comments are blanked out before scanning so commented-out imports are not
//! picked up; string and template literals are otherwise left alone.

use regex::Regex;
use std::collections::HashSet;

use crate::constants::{ALIAS_PREFIX, ALIAS_ROOT, UI_DIR, UTILS_DIR};

/// Dependencies referenced by one source file.
///
/// Each list is duplicate-free and keeps first-seen order so logs and
/// installer arguments are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Names of shared UI files.
    pub ui: Vec<String>,
    /// Names of shared utility files.
    pub utils: Vec<String>,
    /// External package roots.
    pub packages: Vec<String>,
}

impl DependencySet {
    /// Whether nothing at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ui.is_empty() && self.utils.is_empty() && self.packages.is_empty()
    }
}

/// Compiled import patterns.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    from_clause: Regex,
    side_effect: Regex,
    ui: Regex,
    util: Regex,
}

impl ImportScanner {
    /// Compile the scanner for the standard `@/viz` alias root.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in patterns are invalid.
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_alias_root(ALIAS_ROOT)
    }

    /// Compile the scanner for a custom alias root such as `~/charts`.
    pub fn with_alias_root(alias_root: &str) -> Result<Self, regex::Error> {
        let root = regex::escape(alias_root.trim_end_matches('/'));
        Ok(Self {
            // `[^;"'()]` keeps a clause from running into another statement,
            // a string literal, or a call expression.
            from_clause: Regex::new(
                r#"\b(?:import|export)\b[^;"'()]*?\bfrom\s*["']([^"'\r\n]+)["']"#,
            )?,
            side_effect: Regex::new(r#"\bimport\s*["']([^"'\r\n]+)["']"#)?,
            ui: Regex::new(&format!(r"^{root}/{UI_DIR}/([^/]+)$"))?,
            util: Regex::new(&format!(r"^{root}/{UTILS_DIR}/([^/]+)$"))?,
        })
    }

    /// Extract the UI, utility and package dependencies of `source`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vizkit_cli::scanner::ImportScanner;
    ///
    /// let scanner = ImportScanner::new().unwrap();
    /// let deps = scanner.scan(r#"
    ///     import { ChartCard } from "@/viz/ui/chart-card";
    ///     import { LineChart, Line } from "recharts";
    /// "#);
    /// assert_eq!(deps.ui, vec!["chart-card"]);
    /// assert_eq!(deps.packages, vec!["recharts"]);
    /// ```
    #[must_use]
    pub fn scan(&self, source: &str) -> DependencySet {
        let mut deps = DependencySet::default();
        let mut seen_ui = HashSet::new();
        let mut seen_utils = HashSet::new();
        let mut seen_packages = HashSet::new();

        for specifier in self.specifiers(&strip_comments(source)) {
            if let Some(name) = capture(&self.ui, &specifier) {
                if seen_ui.insert(name.clone()) {
                    deps.ui.push(name);
                }
            }
            if let Some(name) = capture(&self.util, &specifier) {
                if seen_utils.insert(name.clone()) {
                    deps.utils.push(name);
                }
            }
            if is_external(&specifier) {
                let root = package_root(&specifier);
                if seen_packages.insert(root.clone()) {
                    deps.packages.push(root);
                }
            }
        }

        deps
    }

    /// Module specifiers in source order.
    fn specifiers(&self, source: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = self
            .from_clause
            .captures_iter(source)
            .chain(self.side_effect.captures_iter(source))
            .filter_map(|cap| cap.get(1))
            .map(|m| (m.start(), m.as_str().trim().to_string()))
            .collect();
        found.sort_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, specifier)| specifier).collect()
    }
}

fn capture(pattern: &Regex, specifier: &str) -> Option<String> {
    pattern
        .captures(specifier)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether a specifier names an external package rather than a relative,
/// absolute, or aliased project path.
#[must_use]
pub fn is_external(specifier: &str) -> bool {
    !specifier.is_empty()
        && !specifier.starts_with('.')
        && !specifier.starts_with('/')
        && !specifier.starts_with(ALIAS_PREFIX)
}

/// Collapse an import path to the package that provides it.
///
/// Scoped paths keep their first two segments, everything else keeps the
/// first. Collapsing a root again yields the same root.
///
/// ```rust
/// use vizkit_cli::scanner::package_root;
///
/// assert_eq!(package_root("@scope/pkg/sub/path"), "@scope/pkg");
/// assert_eq!(package_root("d3-scale/dist/d3-scale"), "d3-scale");
/// ```
#[must_use]
pub fn package_root(specifier: &str) -> String {
    let take = if specifier.starts_with('@') { 2 } else { 1 };
    specifier.split('/').take(take).collect::<Vec<_>>().join("/")
}

/// Replace `//` and `/* */` comments with whitespace, preserving newlines
/// and leaving string, character and template literals untouched.
fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Literal(char),
    }

    let mut result = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Code => match ch {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    result.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    result.push_str("  ");
                    state = State::BlockComment;
                }
                '"' | '\'' | '`' => {
                    result.push(ch);
                    state = State::Literal(ch);
                }
                _ => result.push(ch),
            },
            State::LineComment => {
                if ch == '\n' {
                    result.push('\n');
                    state = State::Code;
                } else {
                    result.push(' ');
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    result.push_str("  ");
                    state = State::Code;
                } else if ch == '\n' {
                    result.push('\n');
                } else {
                    result.push(' ');
                }
            }
            State::Literal(quote) => {
                result.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                } else if ch == quote || (ch == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
        }
    }

    result
}
