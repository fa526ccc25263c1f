//! Grapheme cluster handling for glyph sequences.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::FontError;

/// ASCII punctuation in code point order.
const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Split text into extended grapheme clusters.
pub fn graphemes(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_string).collect()
}

/// Split text into grapheme clusters, optionally enforcing a maximum count.
///
/// A `limit` of zero is rejected, as is text holding more clusters than the
/// limit allows.
pub fn parse_graphemes(source: &str, limit: Option<usize>) -> Result<Vec<String>, FontError> {
    if let Some(0) = limit {
        return Err(FontError::InvalidLimit(0));
    }

    let parsed = graphemes(source);
    if let Some(limit) = limit {
        if parsed.len() > limit {
            return Err(FontError::TooManyGraphemes {
                found: parsed.len(),
                limit,
            });
        }
    }
    Ok(parsed)
}

/// Printable ASCII, space through tilde.
pub fn default_sheet_glyphs() -> Vec<String> {
    (32u8..=126).map(|b| (b as char).to_string()).collect()
}

/// Glyphs rendered from outline fonts when no sequence is given.
///
/// Digits, lowercase, uppercase, punctuation, then space.
pub fn default_glyph_sequence() -> Vec<String> {
    ('0'..='9')
        .chain('a'..='z')
        .chain('A'..='Z')
        .chain(ASCII_PUNCTUATION.chars())
        .chain(std::iter::once(' '))
        .map(|c| c.to_string())
        .collect()
}

/// Items for which `is_present` is false, deduplicated in first-seen order.
pub fn ordered_missing<'a, I, F>(items: I, is_present: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| !is_present(*item))
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_printable_parses_to_chars() {
        let printable: String = (32u8..=126).map(|b| b as char).collect();
        let parsed = parse_graphemes(&printable, None).unwrap();
        assert_eq!(parsed.len(), 95);
        assert_eq!(parsed, default_sheet_glyphs());
    }

    #[test]
    fn test_clusters_stay_intact() {
        // family (ZWJ sequence), US flag, thumbs up with skin tone
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let flag = "\u{1F1FA}\u{1F1F8}";
        let thumbs = "\u{1F44D}\u{1F3FD}";
        let text = format!("{family}a{flag}{thumbs}");

        let parsed = parse_graphemes(&text, None).unwrap();
        assert_eq!(parsed, vec![family, "a", flag, thumbs]);
    }

    #[test]
    fn test_combining_mark_joins_base() {
        let parsed = parse_graphemes("e\u{301}x", None).unwrap();
        assert_eq!(parsed, vec!["e\u{301}", "x"]);
    }

    #[test]
    fn test_limit_zero_rejected() {
        assert_eq!(parse_graphemes("abc", Some(0)), Err(FontError::InvalidLimit(0)));
    }

    #[test]
    fn test_limit_exceeded() {
        assert_eq!(
            parse_graphemes("abc", Some(2)),
            Err(FontError::TooManyGraphemes { found: 3, limit: 2 })
        );
        assert_eq!(parse_graphemes("abc", Some(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_default_glyph_sequence_order() {
        let sequence = default_glyph_sequence();
        assert_eq!(sequence.len(), 10 + 26 + 26 + 32 + 1);
        assert_eq!(sequence.first().map(String::as_str), Some("0"));
        assert_eq!(sequence[10], "a");
        assert_eq!(sequence[36], "A");
        assert_eq!(sequence[62], "!");
        assert_eq!(sequence.last().map(String::as_str), Some(" "));
    }

    #[test]
    fn test_ordered_missing_is_unique() {
        let missing = ordered_missing(["b", "a", "b", "c", "a"], |g| g == "c");
        assert_eq!(missing, vec!["b", "a"]);
    }
}
