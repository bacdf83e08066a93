//! Self-introduction detection.
//!
//! Recognises phrases such as "me chamo Ana" and yields the introduced name.
//! Patterns are tried in priority order; the first one that matches is
//! authoritative even if a later one would capture something different.

use std::sync::LazyLock;

use regex::Regex;

static IDENTITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i:\b(?:me\s+chamo|meu\s+nome\s+(?:é|e)|sou\s+(?:o|a)))\s+(\p{Lu}\p{L}+)\b",
        r"(?i:\bpode\s+me\s+chamar\s+de)\s+(\p{Lu}\p{L}+)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid identity regex"))
    .collect()
});

/// Extracts a display name from free text.
pub struct IdentityExtractor;

impl IdentityExtractor {
    /// Return the name introduced in `text`, if any.
    ///
    /// The name must start with an uppercase letter and consist only of
    /// letters; accented letters count.
    pub fn extract(text: &str) -> Option<String> {
        IDENTITY_PATTERNS
            .iter()
            .find_map(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
