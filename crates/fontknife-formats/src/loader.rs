//! Loading fonts from sources and writing them to destinations.

use std::fs;
use std::io::{self, BufWriter, Read, Write};

use fontknife_font::RasterFont;
use tracing::debug;

use crate::error::FormatError;
use crate::format::{FontDestination, FontSource, ImageEncoding, OutputFormat, SourceFormat};
use crate::options::{LoadOptions, WriteOptions};

/// Read the raw bytes of a source.
pub fn read_source(source: &FontSource) -> Result<Vec<u8>, FormatError> {
    match source {
        FontSource::Path(path) => Ok(fs::read(path)?),
        FontSource::Stdin => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

/// Parse already-read font data in a known format.
pub fn load_font_from_bytes(
    data: &[u8],
    origin: &str,
    format: SourceFormat,
    options: &LoadOptions,
) -> Result<RasterFont, FormatError> {
    debug!(origin, format = format.name(), bytes = data.len(), "parsing font");
    let font = format.reader().read(data, origin, options)?;
    debug!(origin, glyphs = font.len(), max_size = %font.max_glyph_size(), "parsed font");
    Ok(font)
}

/// Load a font, resolving its format first.
pub fn load_font(
    source: &FontSource,
    format: Option<SourceFormat>,
    options: &LoadOptions,
) -> Result<RasterFont, FormatError> {
    let format = SourceFormat::resolve(source, format)?;
    let data = read_source(source)?;
    load_font_from_bytes(&data, &source.display_name(), format, options)
}

/// Write a font, resolving the output format and image encoding first.
///
/// The image encoding in `options` is replaced by the one implied by the
/// destination.
pub fn write_font(
    font: &RasterFont,
    destination: &FontDestination,
    format: Option<OutputFormat>,
    options: &WriteOptions,
) -> Result<(), FormatError> {
    let format = OutputFormat::resolve(destination, format)?;
    let options = options
        .clone()
        .with_image_encoding(ImageEncoding::for_destination(destination));
    let writer = format.writer();

    // Encode fully before touching the destination so failures leave no
    // partial file behind.
    let mut buffer = Vec::new();
    writer.write(font, &mut buffer, &options)?;

    match destination {
        FontDestination::Path(path) => {
            let mut out = BufWriter::new(fs::File::create(path)?);
            out.write_all(&buffer)?;
            out.flush()?;
        }
        FontDestination::Stdout => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(&buffer)?;
            out.flush()?;
        }
    }
    debug!(
        destination = %destination.display_name(),
        format = format.name(),
        bytes = buffer.len(),
        "wrote font"
    );
    Ok(())
}
