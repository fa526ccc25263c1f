//! X11 Portable Compiled Format (PCF) reader.
//!
//! A PCF file is a table of contents followed by tables. Each table starts
//! with its own little-endian format word; the remaining fields use the byte
//! order that word declares.

use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use fontknife_font::{GlyphBitmap, RasterFont};
use tracing::{debug, trace};

use super::bitmap_font::{build_raster_font, BitmapGlyph, ParsedBitmapFont};
use super::FormatReader;
use crate::error::FormatError;
use crate::options::LoadOptions;

const FORMAT: &str = "PCF";

pub const PCF_MAGIC: &[u8; 4] = b"\x01fcp";

pub const PCF_PROPERTIES: u32 = 1 << 0;
pub const PCF_ACCELERATORS: u32 = 1 << 1;
pub const PCF_METRICS: u32 = 1 << 2;
pub const PCF_BITMAPS: u32 = 1 << 3;
pub const PCF_INK_METRICS: u32 = 1 << 4;
pub const PCF_BDF_ENCODINGS: u32 = 1 << 5;
pub const PCF_SWIDTHS: u32 = 1 << 6;
pub const PCF_GLYPH_NAMES: u32 = 1 << 7;
pub const PCF_BDF_ACCELERATORS: u32 = 1 << 8;

pub const PCF_GLYPH_PAD_MASK: u32 = 3;
pub const PCF_BYTE_ORDER_MSB: u32 = 1 << 2;
pub const PCF_BIT_ORDER_MSB: u32 = 1 << 3;
pub const PCF_SCAN_UNIT_MASK: u32 = 3 << 4;
pub const PCF_COMPRESSED_METRICS: u32 = 0x100;

const NO_GLYPH: u16 = 0xFFFF;

/// Reads binary PCF fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcfReader;

impl FormatReader for PcfReader {
    fn read(
        &self,
        data: &[u8],
        origin: &str,
        options: &LoadOptions,
    ) -> Result<RasterFont, FormatError> {
        let parsed = parse_pcf(data)?;
        Ok(build_raster_font(parsed, options, FORMAT, origin))
    }
}

#[derive(Debug, Clone, Copy)]
struct TocEntry {
    kind: u32,
    format: u32,
    size: u32,
    offset: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Metrics {
    left: i16,
    right: i16,
    width: i16,
    ascent: i16,
    descent: i16,
}

fn table_name(kind: u32) -> &'static str {
    match kind {
        PCF_PROPERTIES => "PROPERTIES",
        PCF_ACCELERATORS => "ACCELERATORS",
        PCF_METRICS => "METRICS",
        PCF_BITMAPS => "BITMAPS",
        PCF_INK_METRICS => "INK_METRICS",
        PCF_BDF_ENCODINGS => "BDF_ENCODINGS",
        PCF_SWIDTHS => "SWIDTHS",
        PCF_GLYPH_NAMES => "GLYPH_NAMES",
        PCF_BDF_ACCELERATORS => "BDF_ACCELERATORS",
        _ => "unknown",
    }
}

impl Metrics {
    fn ink_width(&self) -> u32 {
        (self.right as i32 - self.left as i32).max(0) as u32
    }

    fn ink_height(&self) -> u32 {
        (self.ascent as i32 + self.descent as i32).max(0) as u32
    }
}

fn truncated(what: &str) -> impl Fn(std::io::Error) -> FormatError + '_ {
    move |_| FormatError::parse(FORMAT, format!("{} table is truncated", what))
}

/// Reader positioned inside one table.
struct Table<'a> {
    cursor: Cursor<&'a [u8]>,
    format: u32,
    name: &'static str,
}

impl<'a> Table<'a> {
    fn open(data: &'a [u8], entry: &TocEntry, name: &'static str) -> Result<Self, FormatError> {
        let start = entry.offset as usize;
        let end = start.saturating_add(entry.size as usize).min(data.len());
        if start >= end {
            return Err(FormatError::parse(FORMAT, format!("{} table lies outside the file", name)));
        }
        let mut cursor = Cursor::new(&data[start..end]);
        let format = cursor.read_u32::<LittleEndian>().map_err(truncated(name))?;
        if format != entry.format {
            debug!(table = name, toc = entry.format, table_format = format, "PCF format words differ");
        }
        Ok(Self {
            cursor,
            format,
            name,
        })
    }

    fn big_endian(&self) -> bool {
        self.format & PCF_BYTE_ORDER_MSB != 0
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        self.cursor.read_u8().map_err(truncated(self.name))
    }

    fn u16(&mut self) -> Result<u16, FormatError> {
        let value = if self.big_endian() {
            self.cursor.read_u16::<BigEndian>()
        } else {
            self.cursor.read_u16::<LittleEndian>()
        };
        value.map_err(truncated(self.name))
    }

    fn i16(&mut self) -> Result<i16, FormatError> {
        let value = if self.big_endian() {
            self.cursor.read_i16::<BigEndian>()
        } else {
            self.cursor.read_i16::<LittleEndian>()
        };
        value.map_err(truncated(self.name))
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        let value = if self.big_endian() {
            self.cursor.read_u32::<BigEndian>()
        } else {
            self.cursor.read_u32::<LittleEndian>()
        };
        value.map_err(truncated(self.name))
    }

    fn i32(&mut self) -> Result<i32, FormatError> {
        let value = if self.big_endian() {
            self.cursor.read_i32::<BigEndian>()
        } else {
            self.cursor.read_i32::<LittleEndian>()
        };
        value.map_err(truncated(self.name))
    }

    fn skip(&mut self, bytes: i64) -> Result<(), FormatError> {
        self.cursor
            .seek(SeekFrom::Current(bytes))
            .map(|_| ())
            .map_err(truncated(self.name))
    }

    fn bytes(&mut self, len: usize) -> Result<Vec<u8>, FormatError> {
        let mut buf = vec![0; len];
        self.cursor.read_exact(&mut buf).map_err(truncated(self.name))?;
        Ok(buf)
    }
}

/// Parse PCF data into glyph black boxes and font properties.
pub fn parse_pcf(data: &[u8]) -> Result<ParsedBitmapFont, FormatError> {
    let toc = read_toc(data)?;
    for entry in &toc {
        trace!(table = table_name(entry.kind), offset = entry.offset, size = entry.size, "PCF table");
    }
    let find = |kind: u32| toc.iter().find(|entry| entry.kind == kind);

    let properties = match find(PCF_PROPERTIES) {
        Some(entry) => read_properties(data, entry)?,
        None => Vec::new(),
    };
    let metrics_entry = find(PCF_METRICS)
        .ok_or_else(|| FormatError::parse(FORMAT, "missing METRICS table"))?;
    let bitmaps_entry = find(PCF_BITMAPS)
        .ok_or_else(|| FormatError::parse(FORMAT, "missing BITMAPS table"))?;
    let encodings_entry = find(PCF_BDF_ENCODINGS)
        .ok_or_else(|| FormatError::parse(FORMAT, "missing BDF_ENCODINGS table"))?;

    let metrics = read_metrics(data, metrics_entry)?;
    let bitmaps = read_bitmaps(data, bitmaps_entry, &metrics)?;
    let encodings = read_encodings(data, encodings_entry)?;

    let mut glyphs = Vec::with_capacity(encodings.len());
    for (code_point, index) in encodings {
        let index = index as usize;
        let (Some(m), Some(ink)) = (metrics.get(index), bitmaps.get(index)) else {
            return Err(FormatError::parse(
                FORMAT,
                format!("encoding refers to missing glyph {}", index),
            ));
        };
        glyphs.push(BitmapGlyph {
            code_point,
            advance: m.width as i32,
            x_offset: m.left as i32,
            y_offset: -(m.descent as i32),
            ink: ink.clone(),
        });
    }

    debug!(glyphs = glyphs.len(), properties = properties.len(), "parsed PCF font");
    Ok(ParsedBitmapFont { glyphs, properties })
}

fn read_toc(data: &[u8]) -> Result<Vec<TocEntry>, FormatError> {
    if data.len() < 8 || &data[..4] != PCF_MAGIC {
        return Err(FormatError::parse(FORMAT, "missing PCF header"));
    }
    let mut cursor = Cursor::new(data);
    cursor.set_position(4);
    let count = cursor
        .read_u32::<LittleEndian>()
        .map_err(truncated("table of contents"))?;

    let mut toc = Vec::new();
    for _ in 0..count {
        let mut field = || {
            cursor
                .read_u32::<LittleEndian>()
                .map_err(truncated("table of contents"))
        };
        toc.push(TocEntry {
            kind: field()?,
            format: field()?,
            size: field()?,
            offset: field()?,
        });
    }
    Ok(toc)
}

fn read_properties(data: &[u8], entry: &TocEntry) -> Result<Vec<(String, String)>, FormatError> {
    let mut table = Table::open(data, entry, "PROPERTIES")?;
    let count = table.u32()? as usize;

    let mut raw = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let name_offset = table.i32()?;
        let is_string = table.u8()? != 0;
        let value = table.i32()?;
        raw.push((name_offset, is_string, value));
    }
    if count & 3 != 0 {
        table.skip(4 - (count & 3) as i64)?;
    }
    let strings_len = table.u32()? as usize;
    let strings = table.bytes(strings_len)?;

    let string_at = |offset: i32| -> String {
        let start = (offset.max(0) as usize).min(strings.len());
        let end = strings[start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(strings.len(), |p| start + p);
        String::from_utf8_lossy(&strings[start..end]).into_owned()
    };

    Ok(raw
        .into_iter()
        .map(|(name, is_string, value)| {
            let value = if is_string {
                string_at(value)
            } else {
                value.to_string()
            };
            (string_at(name), value)
        })
        .collect())
}

fn read_metrics(data: &[u8], entry: &TocEntry) -> Result<Vec<Metrics>, FormatError> {
    let mut table = Table::open(data, entry, "METRICS")?;

    if table.format & PCF_COMPRESSED_METRICS != 0 {
        let count = table.u16()? as usize;
        let mut metrics = Vec::with_capacity(count);
        for _ in 0..count {
            let mut field = || -> Result<i16, FormatError> { Ok(table.u8()? as i16 - 0x80) };
            metrics.push(Metrics {
                left: field()?,
                right: field()?,
                width: field()?,
                ascent: field()?,
                descent: field()?,
            });
        }
        Ok(metrics)
    } else {
        let count = table.u32()? as usize;
        let mut metrics = Vec::with_capacity(count.min(65536));
        for _ in 0..count {
            let m = Metrics {
                left: table.i16()?,
                right: table.i16()?,
                width: table.i16()?,
                ascent: table.i16()?,
                descent: table.i16()?,
            };
            // Character attributes
            table.u16()?;
            metrics.push(m);
        }
        Ok(metrics)
    }
}

fn read_bitmaps(
    data: &[u8],
    entry: &TocEntry,
    metrics: &[Metrics],
) -> Result<Vec<GlyphBitmap>, FormatError> {
    let mut table = Table::open(data, entry, "BITMAPS")?;
    let count = table.u32()? as usize;
    if count != metrics.len() {
        return Err(FormatError::parse(
            FORMAT,
            format!("{} bitmaps but {} metrics", count, metrics.len()),
        ));
    }

    let offsets = (0..count)
        .map(|_| table.u32())
        .collect::<Result<Vec<_>, _>>()?;
    let mut sizes = [0u32; 4];
    for size in sizes.iter_mut() {
        *size = table.u32()?;
    }

    let pad_index = (table.format & PCF_GLYPH_PAD_MASK) as usize;
    let pad = 1usize << pad_index;
    let scan_unit = 1usize << ((table.format & PCF_SCAN_UNIT_MASK) >> 4);
    let bit_msb = table.format & PCF_BIT_ORDER_MSB != 0;
    let byte_msb = table.format & PCF_BYTE_ORDER_MSB != 0;

    let mut bitmap_data = table.bytes(sizes[pad_index] as usize)?;
    if !bit_msb {
        for byte in bitmap_data.iter_mut() {
            *byte = byte.reverse_bits();
        }
    }
    if bit_msb != byte_msb && scan_unit > 1 {
        for unit in bitmap_data.chunks_exact_mut(scan_unit) {
            unit.reverse();
        }
    }

    metrics
        .iter()
        .zip(offsets)
        .map(|(m, offset)| {
            let (width, height) = (m.ink_width(), m.ink_height());
            let row_bytes = (width as usize).div_ceil(8).div_ceil(pad) * pad;
            let start = offset as usize;
            let end = start + row_bytes * height as usize;
            let rows = bitmap_data.get(start..end).ok_or_else(|| {
                FormatError::parse(FORMAT, format!("glyph bitmap at offset {} is truncated", start))
            })?;

            Ok(GlyphBitmap::from_fn(width, height, |x, y| {
                let byte = rows[y as usize * row_bytes + (x / 8) as usize];
                byte & (0x80 >> (x % 8)) != 0
            }))
        })
        .collect()
}

/// Map of code point to glyph index.
fn read_encodings(data: &[u8], entry: &TocEntry) -> Result<Vec<(u32, u16)>, FormatError> {
    let mut table = Table::open(data, entry, "BDF_ENCODINGS")?;
    let min_byte2 = table.i16()?;
    let max_byte2 = table.i16()?;
    let min_byte1 = table.i16()?;
    let max_byte1 = table.i16()?;
    let _default_char = table.i16()?;

    if min_byte2 > max_byte2 || min_byte1 > max_byte1 || min_byte2 < 0 || min_byte1 < 0 {
        return Err(FormatError::parse(FORMAT, "invalid encoding ranges"));
    }

    let mut encodings = Vec::new();
    for byte1 in min_byte1..=max_byte1 {
        for byte2 in min_byte2..=max_byte2 {
            let index = table.u16()?;
            if index != NO_GLYPH {
                encodings.push((((byte1 as u32) << 8) | byte2 as u32, index));
            }
        }
    }
    Ok(encodings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use fontknife_font::Size;
    use pretty_assertions::assert_eq;

    /// Minimal little-endian, uncompressed PCF with glyphs 'A' and 'B'.
    fn tiny_pcf(compressed: bool, format_bits: u32) -> Vec<u8> {
        let le = format_bits & PCF_BYTE_ORDER_MSB == 0;
        let w16 = |buf: &mut Vec<u8>, v: i16| {
            if le {
                buf.write_i16::<LittleEndian>(v).unwrap()
            } else {
                buf.write_i16::<BigEndian>(v).unwrap()
            }
        };
        let w32 = |buf: &mut Vec<u8>, v: u32| {
            if le {
                buf.write_u32::<LittleEndian>(v).unwrap()
            } else {
                buf.write_u32::<BigEndian>(v).unwrap()
            }
        };

        // 3x2 glyphs on a baseline with one pixel of descent
        let metrics_format = format_bits | if compressed { PCF_COMPRESSED_METRICS } else { 0 };
        let mut metrics = Vec::new();
        metrics.write_u32::<LittleEndian>(metrics_format).unwrap();
        if compressed {
            if le {
                metrics.write_u16::<LittleEndian>(2).unwrap();
            } else {
                metrics.write_u16::<BigEndian>(2).unwrap();
            }
            for _ in 0..2 {
                for v in [0i16, 3, 4, 1, 1] {
                    metrics.push((v + 0x80) as u8);
                }
            }
        } else {
            w32(&mut metrics, 2);
            for _ in 0..2 {
                for v in [0i16, 3, 4, 1, 1, 0] {
                    w16(&mut metrics, v);
                }
            }
        }

        // Pad rows to 1 byte
        let mut bitmaps = Vec::new();
        bitmaps.write_u32::<LittleEndian>(format_bits).unwrap();
        w32(&mut bitmaps, 2);
        w32(&mut bitmaps, 0);
        w32(&mut bitmaps, 2);
        for size in [4u32, 8, 16, 16] {
            w32(&mut bitmaps, size);
        }
        let mut rows = vec![0b1010_0000u8, 0b0100_0000, 0b1110_0000, 0b1010_0000];
        if format_bits & PCF_BIT_ORDER_MSB == 0 {
            rows.iter_mut().for_each(|b| *b = b.reverse_bits());
        }
        bitmaps.extend(rows);

        let mut encodings = Vec::new();
        encodings.write_u32::<LittleEndian>(format_bits).unwrap();
        for v in [65i16, 67, 0, 0, 0] {
            w16(&mut encodings, v);
        }
        for index in [0u16, 0xFFFF, 1] {
            w16(&mut encodings, index as i16);
        }

        let mut properties = Vec::new();
        properties.write_u32::<LittleEndian>(format_bits).unwrap();
        w32(&mut properties, 1);
        w32(&mut properties, 0);
        properties.push(1);
        w32(&mut properties, 8);
        properties.extend([0, 0, 0]);
        w32(&mut properties, 12);
        properties.extend(b"FOUNDRY\0Tst\0");

        let tables = [
            (PCF_PROPERTIES, properties),
            (PCF_METRICS, metrics),
            (PCF_BITMAPS, bitmaps),
            (PCF_BDF_ENCODINGS, encodings),
        ];
        let mut out = Vec::new();
        out.extend(PCF_MAGIC);
        out.write_u32::<LittleEndian>(tables.len() as u32).unwrap();
        let mut offset = 8 + 16 * tables.len() as u32;
        for (kind, table) in &tables {
            let format = u32::from_le_bytes([table[0], table[1], table[2], table[3]]);
            for v in [*kind, format, table.len() as u32, offset] {
                out.write_u32::<LittleEndian>(v).unwrap();
            }
            offset += table.len() as u32;
        }
        for (_, table) in &tables {
            out.extend(table);
        }
        out
    }

    #[test]
    fn test_parse_uncompressed_lsb() {
        let parsed = parse_pcf(&tiny_pcf(false, 0)).unwrap();
        assert_eq!(parsed.glyphs.len(), 2);
        assert_eq!(parsed.glyphs[0].code_point, 65);
        assert_eq!(parsed.glyphs[1].code_point, 67);
        assert_eq!(parsed.glyphs[0].y_offset, -1);
        assert_eq!(
            parsed.glyphs[0].ink.to_text_rows('X', '.'),
            vec!["X.X", ".X."]
        );
        assert_eq!(
            parsed.properties,
            vec![("FOUNDRY".to_string(), "Tst".to_string())]
        );
    }

    #[test]
    fn test_parse_compressed_msb() {
        let parsed =
            parse_pcf(&tiny_pcf(true, PCF_BYTE_ORDER_MSB | PCF_BIT_ORDER_MSB)).unwrap();
        assert_eq!(
            parsed.glyphs[1].ink.to_text_rows('X', '.'),
            vec!["XXX", "X.X"]
        );
    }

    #[test]
    fn test_read_font() {
        let font = PcfReader
            .read(&tiny_pcf(false, 0), "tiny.pcf", &LoadOptions::default())
            .unwrap();
        assert_eq!(font.provided_glyphs(), vec!["A", "C"]);
        assert_eq!(font.max_glyph_size(), Size::new(4, 2));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = parse_pcf(b"STARTFONT 2.1\n").unwrap_err();
        assert!(err.to_string().contains("missing PCF header"));
    }

    #[test]
    fn test_truncated_table() {
        let mut data = tiny_pcf(false, 0);
        data.truncate(data.len() - 20);
        assert!(parse_pcf(&data).is_err());
    }
}
