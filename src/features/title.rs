//! Honorific extraction from passenger names

use regex::Regex;
use std::sync::LazyLock;

/// Text after the surname comma and before the first period
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s*([^.]+)\.").expect("title pattern is a valid regex")
});

/// Pull the raw title out of a name like "Braund, Mr. Owen Harris"
pub fn extract_title(name: &str) -> Option<&str> {
    TITLE_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Fold French and informal variants onto the titles the model knows
pub fn normalize_title(title: &str) -> &str {
    match title {
        "Mlle" | "Ms" => "Miss",
        "Mme" => "Mrs",
        other => other,
    }
}

/// Extracted and normalized title, `None` when the name has no title token
pub fn title_of(name: &str) -> Option<String> {
    extract_title(name).map(|t| normalize_title(t).to_string())
}
