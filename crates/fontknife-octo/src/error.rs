//! Error types for Octo code emission.

use fontknife_font::FontError;
use thiserror::Error;

/// Reasons a font cannot be emitted as Octo code.
#[derive(Debug, Error)]
pub enum OctoError {
    #[error("Did not find font dimensions")]
    NoDimensions,

    #[error("Font width larger than {max} pixels, not yet supported")]
    TooWide { width: u32, max: u32 },

    #[error("Font height larger than {max} pixels, not yet supported")]
    TooTall { height: u32, max: u32 },

    #[error("{count} glyphs requested, but at most {max} fit in a glyph table")]
    TooManyGlyphs { count: usize, max: usize },

    /// The glyph is not one code point in the 0-255 range.
    #[error("Glyph {0:?} cannot be addressed by a single byte")]
    UnaddressableGlyph(String),

    #[error("Label prefix {0:?} must be non-empty and contain no whitespace")]
    InvalidLabelPrefix(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Font(#[from] FontError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_messages() {
        assert_eq!(
            OctoError::TooWide { width: 9, max: 8 }.to_string(),
            "Font width larger than 8 pixels, not yet supported"
        );
        assert_eq!(
            OctoError::NoDimensions.to_string(),
            "Did not find font dimensions"
        );
    }
}
