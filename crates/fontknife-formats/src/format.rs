//! Format registry and detection.
//!
//! Readers and writers are selected through closed enums. A format is either
//! named explicitly or guessed from the lowercase file extension; streams
//! (`-`) always need an explicit format.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::FormatError;
use crate::readers::{
    BdfReader, FormatReader, PcfReader, SpriteSheetReader, TextFontReader, TrueTypeReader,
};
use crate::writers::{FormatWriter, SpriteSheetWriter, TextFontWriter};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tga"];

/// Where a font is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Path(PathBuf),
    Stdin,
}

impl FontSource {
    /// Interpret a command-line argument, where `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            FontSource::Stdin
        } else {
            FontSource::Path(PathBuf::from(arg))
        }
    }

    /// Name used in messages and font metadata.
    pub fn display_name(&self) -> String {
        match self {
            FontSource::Path(path) => path.display().to_string(),
            FontSource::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Where a font is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontDestination {
    Path(PathBuf),
    Stdout,
}

impl FontDestination {
    /// Interpret a command-line argument, where `-` means stdout.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            FontDestination::Stdout
        } else {
            FontDestination::Path(PathBuf::from(arg))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            FontDestination::Path(path) => path.display().to_string(),
            FontDestination::Stdout => "<stdout>".to_string(),
        }
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Formats fonts can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Bdf,
    Pcf,
    TrueType,
    SpriteSheetGrid,
    TextFont,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Bdf,
        SourceFormat::Pcf,
        SourceFormat::TrueType,
        SourceFormat::SpriteSheetGrid,
        SourceFormat::TextFont,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Bdf => "bdf",
            SourceFormat::Pcf => "pcf",
            SourceFormat::TrueType => "truetype",
            SourceFormat::SpriteSheetGrid => "spritesheet-grid",
            SourceFormat::TextFont => "textfont",
        }
    }

    /// Lowercase file extensions, without the dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceFormat::Bdf => &["bdf"],
            SourceFormat::Pcf => &["pcf"],
            SourceFormat::TrueType => &["ttf", "otf"],
            SourceFormat::SpriteSheetGrid => IMAGE_EXTENSIONS,
            SourceFormat::TextFont => &["textfont"],
        }
    }

    /// Whether the format holds pre-rasterized bitmaps.
    pub fn is_bitmap(&self) -> bool {
        !matches!(self, SourceFormat::TrueType)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Guess a format from a path's extension.
    pub fn guess(path: &Path) -> Option<Self> {
        lowercase_extension(path).and_then(|ext| Self::from_extension(&ext))
    }

    /// Pick the explicit format, or guess one from the source path.
    pub fn resolve(source: &FontSource, explicit: Option<Self>) -> Result<Self, FormatError> {
        if let Some(format) = explicit {
            return Ok(format);
        }
        match source {
            FontSource::Stdin => Err(FormatError::StdinRequiresFormat),
            FontSource::Path(path) => {
                let format = Self::guess(path).ok_or_else(|| {
                    FormatError::UnclearSourceFontFormat(path.display().to_string())
                })?;
                debug!(path = %path.display(), format = format.name(), "guessed source format");
                Ok(format)
            }
        }
    }

    pub fn reader(&self) -> Box<dyn FormatReader> {
        match self {
            SourceFormat::Bdf => Box::new(BdfReader),
            SourceFormat::Pcf => Box::new(PcfReader),
            SourceFormat::TrueType => Box::new(TrueTypeReader),
            SourceFormat::SpriteSheetGrid => Box::new(SpriteSheetReader),
            SourceFormat::TextFont => Box::new(TextFontReader),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::UnknownFormat {
                kind: "source",
                name: s.to_string(),
                expected: Self::ALL.map(|f| f.name()).join(", "),
            })
    }
}

/// Formats fonts can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    SpriteSheetGrid,
    TextFont,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::SpriteSheetGrid, OutputFormat::TextFont];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::SpriteSheetGrid => "spritesheet-grid",
            OutputFormat::TextFont => "textfont",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            OutputFormat::SpriteSheetGrid => IMAGE_EXTENSIONS,
            OutputFormat::TextFont => &["textfont"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    pub fn guess(path: &Path) -> Option<Self> {
        lowercase_extension(path).and_then(|ext| Self::from_extension(&ext))
    }

    /// Pick the explicit format, or guess one from the destination path.
    pub fn resolve(destination: &FontDestination, explicit: Option<Self>) -> Result<Self, FormatError> {
        if let Some(format) = explicit {
            return Ok(format);
        }
        match destination {
            FontDestination::Stdout => Err(FormatError::StdoutRequiresFormat),
            FontDestination::Path(path) => {
                let format = Self::guess(path).ok_or_else(|| {
                    FormatError::UnclearOutputFontFormat(path.display().to_string())
                })?;
                debug!(path = %path.display(), format = format.name(), "guessed output format");
                Ok(format)
            }
        }
    }

    pub fn writer(&self) -> Box<dyn FormatWriter> {
        match self {
            OutputFormat::SpriteSheetGrid => Box::new(SpriteSheetWriter),
            OutputFormat::TextFont => Box::new(TextFontWriter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::UnknownFormat {
                kind: "output",
                name: s.to_string(),
                expected: Self::ALL.map(|f| f.name()).join(", "),
            })
    }
}

/// Image encodings a sprite sheet can be saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageEncoding {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tga,
}

impl ImageEncoding {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageEncoding::Png),
            "jpg" | "jpeg" => Some(ImageEncoding::Jpeg),
            "bmp" => Some(ImageEncoding::Bmp),
            "tga" => Some(ImageEncoding::Tga),
            _ => None,
        }
    }

    /// Encoding for a destination; streams and unknown extensions get PNG.
    pub fn for_destination(destination: &FontDestination) -> Self {
        match destination {
            FontDestination::Path(path) => lowercase_extension(path)
                .and_then(|ext| Self::from_extension(&ext))
                .unwrap_or_default(),
            FontDestination::Stdout => ImageEncoding::Png,
        }
    }
}
