//! Error types for font loading and writing.

use fontknife_font::FontError;
use thiserror::Error;

use crate::png::PngError;

/// Errors that can occur while resolving formats, reading fonts or writing
/// them back out.
#[derive(Debug, Error)]
pub enum FormatError {
    /// No source format was given and none could be guessed.
    #[error("Could not resolve a source font format for '{0}'. Please specify it directly.")]
    UnclearSourceFontFormat(String),

    /// No output format was given and none could be guessed.
    #[error("Could not resolve an output font format for '{0}'. Please specify it directly.")]
    UnclearOutputFontFormat(String),

    /// Reading from stdin needs an explicit format.
    #[error("You must specify a source format when piping from stdin.")]
    StdinRequiresFormat,

    /// Writing to stdout needs an explicit format.
    #[error("You must specify an output format when piping to stdout.")]
    StdoutRequiresFormat,

    /// A format name that is not registered.
    #[error("Unknown {kind} format '{name}'. Expected one of: {expected}")]
    UnknownFormat {
        kind: &'static str,
        name: String,
        expected: String,
    },

    /// Malformed input for a line-based format.
    #[error("Invalid {format} data, line {line}: {message}")]
    ParseLine {
        format: &'static str,
        line: usize,
        message: String,
    },

    /// Malformed input for a binary or image format.
    #[error("Invalid {format} data: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Malformed textfont input, reported against the file it came from.
    #[error("{file}, line {line}: {message}")]
    TextFont {
        file: String,
        line: usize,
        message: String,
    },

    /// A glyph too wide to write in the requested format.
    #[error("Maximum glyph width ({width}) exceeds maximum specified line width: {max}")]
    GlyphTooWide { width: u32, max: u32 },

    /// More glyphs requested than a sprite-sheet grid can hold.
    #[error("{glyphs} glyphs requested, but the sheet grid only has {tiles} tiles")]
    TooManyGlyphs { glyphs: usize, tiles: usize },

    /// A sprite sheet with more pixels than the writer will allocate.
    #[error("Sprite sheet of {width}x{height} px exceeds the limit of {max_pixels} pixels")]
    SheetTooLarge {
        width: u64,
        height: u64,
        max_pixels: u64,
    },

    /// A color string that is not `#RRGGBB` or `#RRGGBBAA`.
    #[error("Invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Png(#[from] PngError),

    #[error(transparent)]
    Font(#[from] FontError),
}

impl FormatError {
    pub(crate) fn parse(format: &'static str, message: impl Into<String>) -> Self {
        FormatError::Parse {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn parse_line(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        FormatError::ParseLine {
            format,
            line,
            message: message.into(),
        }
    }

    /// Whether this error comes from resolving which format to use.
    ///
    /// Front ends print usage help alongside these.
    pub fn is_format_resolution(&self) -> bool {
        matches!(
            self,
            FormatError::UnclearSourceFontFormat(_)
                | FormatError::UnclearOutputFontFormat(_)
                | FormatError::StdinRequiresFormat
                | FormatError::StdoutRequiresFormat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclear_format_message() {
        let err = FormatError::UnclearSourceFontFormat("font.xyz".to_string());
        assert_eq!(
            err.to_string(),
            "Could not resolve a source font format for 'font.xyz'. Please specify it directly."
        );
        assert!(err.is_format_resolution());
    }

    #[test]
    fn test_textfont_message_has_location() {
        let err = FormatError::TextFont {
            file: "glyphs.textfont".to_string(),
            line: 7,
            message: "Malformed glyph header".to_string(),
        };
        assert_eq!(err.to_string(), "glyphs.textfont, line 7: Malformed glyph header");
        assert!(!err.is_format_resolution());
    }
}
