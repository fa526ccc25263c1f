//! CLI command implementations

pub mod cache;
pub mod convert;
pub mod emit_code;
pub mod formats;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use fontknife_font::RasterFont;
use fontknife_formats::{load_font_from_bytes, read_source, FontSource, LoadOptions, SourceFormat};

use crate::args::{CacheOptions, SourceArgs};
use crate::cache::{CacheKey, CacheManager};

/// A source font ready for output.
#[derive(Debug)]
pub struct LoadedFont {
    pub font: RasterFont,
    pub source: FontSource,
    /// Whether the font came from the parsed-font cache
    pub cached: bool,
}

/// Read and parse the font named by `input` (`-` for stdin).
///
/// Consults the parsed-font cache first when enabled. Cache failures are
/// logged and otherwise ignored.
pub fn load_source_font(
    input: &str,
    args: &SourceArgs,
    cache: &CacheOptions,
) -> Result<LoadedFont> {
    let source = FontSource::from_arg(input);
    let format = SourceFormat::resolve(&source, args.src_format)?;
    let options = args.load_options()?;
    let data = read_source(&source)
        .with_context(|| format!("Failed to read font: {}", source.display_name()))?;

    let cache_entry = if cache.enabled {
        match open_cache_entry(cache, &data, format, &options) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("parsed-font cache unavailable: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    if let Some((key, manager)) = &cache_entry {
        match manager.get(key) {
            Ok(Some(font)) => {
                debug!(source = %source.display_name(), "loaded font from cache");
                return Ok(LoadedFont {
                    font,
                    source,
                    cached: true,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("ignoring unreadable cache entry: {:#}", e),
        }
    }

    let font = load_font_from_bytes(&data, &source.display_name(), format, &options)?;

    if let Some((key, manager)) = &cache_entry {
        if let Err(e) = manager.put(key, &font, &source.display_name()) {
            warn!("failed to cache parsed font: {:#}", e);
        }
    }

    Ok(LoadedFont {
        font,
        source,
        cached: false,
    })
}

fn open_cache_entry(
    cache: &CacheOptions,
    data: &[u8],
    format: SourceFormat,
    options: &LoadOptions,
) -> Result<(CacheKey, CacheManager)> {
    let manager = CacheManager::new(cache.dir.clone())?;
    let key = CacheKey::new(data, format, options)?;
    Ok((key, manager))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontknife_formats::FormatError;
    use std::fs;
    use tempfile::TempDir;

    const TEXTFONT: &str = "GLYPH: \"a\"\nX.\n.X\nGLYPH: \"b\"\nXX\nXX\n";

    #[test]
    fn test_load_uses_cache_on_second_run() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("glyphs.textfont");
        fs::write(&input, TEXTFONT).unwrap();
        let cache = CacheOptions::in_dir(temp.path().join("cache"));
        let input = input.to_str().unwrap();

        let first = load_source_font(input, &SourceArgs::default(), &cache).unwrap();
        let second = load_source_font(input, &SourceArgs::default(), &cache).unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.font.provided_glyphs(), second.font.provided_glyphs());
        assert_eq!(
            first.font.get_glyph("a", true).unwrap(),
            second.font.get_glyph("a", true).unwrap()
        );
    }

    #[test]
    fn test_load_without_cache_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("glyphs.textfont");
        fs::write(&input, TEXTFONT).unwrap();

        let loaded = load_source_font(
            input.to_str().unwrap(),
            &SourceArgs::default(),
            &CacheOptions::disabled(),
        )
        .unwrap();

        assert!(!loaded.cached);
        assert_eq!(loaded.font.len(), 2);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unknown_extension_is_format_resolution_error() {
        let err = load_source_font("font.xyz", &SourceArgs::default(), &CacheOptions::disabled())
            .unwrap_err();
        let format_err = err.downcast_ref::<FormatError>().unwrap();
        assert!(format_err.is_format_resolution());
    }
}
