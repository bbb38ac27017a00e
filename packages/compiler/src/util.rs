//! Utility Functions
//!
//! Common string helpers shared by the parser and the generator

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for dash-case to camelCase conversion
static CAMELIZE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\w)").unwrap());

/// Regex for camelCase to dash-case conversion
static HYPHENATE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\B([A-Z])").unwrap());

/// Convert dash-case to camelCase
pub fn camelize(input: &str) -> String {
    CAMELIZE_REGEXP
        .replace_all(input, |caps: &regex::Captures| {
            caps.get(1)
                .map(|m| m.as_str().to_uppercase())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Convert camelCase to dash-case
pub fn hyphenate(input: &str) -> String {
    HYPHENATE_REGEXP
        .replace_all(input, "-$1")
        .to_lowercase()
}

/// Upper-case the first character
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
