//! Identifier formatting for usage hints.

/// Convert a hyphen-delimited file name into a PascalCase identifier.
///
/// Each `-`-separated word has its first character uppercased and the rest
/// kept as-is; empty words (from repeated hyphens) are dropped.
///
/// ```rust
/// use vizkit_cli::utils::naming::pascal_case;
///
/// assert_eq!(pascal_case("timeseries-line-v1"), "TimeseriesLineV1");
/// ```
#[must_use]
pub fn pascal_case(name: &str) -> String {
    name.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
