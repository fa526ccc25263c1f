//! Error types for the raster font model.

use thiserror::Error;

/// Errors raised by font model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    /// One or more glyphs needed for an operation are not in the font.
    #[error("{context}: missing glyphs {}", quote_all(.missing))]
    MissingGlyphs {
        /// What was being attempted.
        context: String,
        /// The missing glyph keys, in first-seen order.
        missing: Vec<String>,
    },

    /// Too many grid dimensions were left unspecified.
    #[error(
        "At most 1 grid dimension may be omitted, but {} were omitted: {}",
        .missing.len(),
        .missing.join(", ")
    )]
    GridArguments {
        /// Names of the omitted dimensions.
        missing: Vec<&'static str>,
    },

    /// Grid dimensions that cannot describe any tiles.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A linear tile index outside the grid.
    #[error("Index {index} not in grid of {len} tiles")]
    IndexOutOfGrid {
        /// The rejected index.
        index: usize,
        /// Number of tiles in the grid.
        len: usize,
    },

    /// A grapheme limit of zero.
    #[error("limit must have value 1 or greater, not {0}")]
    InvalidLimit(usize),

    /// More graphemes than a caller-supplied limit.
    #[error("source has more graphemes ({found}) than the passed limit allows ({limit})")]
    TooManyGraphemes {
        /// Graphemes found in the source.
        found: usize,
        /// The limit that was exceeded.
        limit: usize,
    },

    /// Grid dimensions whose pixel extent leaves the 32-bit coordinate range.
    #[error("Sheet grid too large: {0}")]
    SheetTooLarge(String),

    /// A sprite sheet scale factor below 1.
    #[error("sheet scale must be 1 or greater, not {0}")]
    InvalidScale(u32),

    /// Pixel data that does not match the declared bitmap dimensions.
    #[error("Expected {expected} pixels for a {width}x{height} bitmap, got {actual}")]
    BitmapLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

fn quote_all(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_glyphs_message_quotes_keys() {
        let err = FontError::MissingGlyphs {
            context: "Can't calculate size for \"ab\"".to_string(),
            missing: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Can't calculate size for \"ab\": missing glyphs \"a\", \"b\""
        );
    }

    #[test]
    fn test_grid_arguments_message_lists_names() {
        let err = FontError::GridArguments {
            missing: vec!["sheet_bounds_px", "tile_size_px"],
        };
        assert_eq!(
            err.to_string(),
            "At most 1 grid dimension may be omitted, but 2 were omitted: sheet_bounds_px, tile_size_px"
        );
    }
}
