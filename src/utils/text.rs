// src/utils/text.rs

//! Text cleanup helpers shared across extraction and normalization.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse all runs of whitespace (including non-breaking spaces) into
/// single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase identifier slug: alphanumerics kept, everything else
/// collapsed to single underscores.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut last_sep = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_sep = false;
        } else if !last_sep {
            slug.push('_');
            last_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Truncate to at most `max` grapheme clusters without splitting one.
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    s.graphemes(true).take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Wed,\n Sep\t24,\u{a0}2025  "),
            "Wed, Sep 24, 2025"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("French & Italian"), "french_italian");
        assert_eq!(slugify("  East Asian Studies "), "east_asian_studies");
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("héllo wörld", 5), "héllo");
        // Combining sequences stay intact
        assert_eq!(truncate_graphemes("e\u{301}x", 1), "e\u{301}");
    }
}
