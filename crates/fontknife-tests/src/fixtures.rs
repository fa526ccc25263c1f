//! Test fixture utilities for creating synthetic fonts.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use fontknife_formats::readers::{
    PCF_BDF_ENCODINGS, PCF_BITMAPS, PCF_BIT_ORDER_MSB, PCF_BYTE_ORDER_MSB, PCF_MAGIC,
    PCF_METRICS, PCF_PROPERTIES,
};

/// Glyphs with one row below the baseline.
const DESCENDERS: &str = "gjpqy,;";

/// A directory holding generated fonts and command outputs.
pub struct FontFixture {
    pub root: TempDir,
}

impl FontFixture {
    /// Create a new empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path for a file in the fixture, as a string for command arguments.
    pub fn file(&self, name: &str) -> String {
        self.path().join(name).display().to_string()
    }

    /// Write a file into the fixture.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Read a file from the fixture.
    pub fn read(&self, name: &str) -> Vec<u8> {
        fs::read(self.path().join(name)).expect("Failed to read fixture file")
    }
}

impl Default for FontFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One glyph of a synthetic bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureGlyph {
    pub code_point: u32,
    pub width: u32,
    /// Ink rows, leftmost pixel in the high bit (fonts up to 8 px wide).
    pub rows: Vec<u8>,
    pub x_offset: i32,
    /// Bottom of the ink relative to the baseline.
    pub y_offset: i32,
    pub advance: i32,
}

impl FixtureGlyph {
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Whether the ink pixel at (x, y) is set.
    pub fn ink(&self, x: u32, y: u32) -> bool {
        self.rows
            .get(y as usize)
            .is_some_and(|row| x < 8 && row & (0x80 >> x) != 0)
    }
}

/// Code points of the tom-thumb-like fixture: printable ASCII and Latin-1.
pub fn tom_thumb_codes() -> Vec<u32> {
    (32..=126).chain(160..=255).collect()
}

/// 3x5 glyphs on a 4 px advance; descenders drop one row below the baseline.
///
/// Shapes are derived from the code point so every glyph differs; the two
/// spaces are blank.
pub fn tom_thumb_glyphs() -> Vec<FixtureGlyph> {
    tom_thumb_codes()
        .into_iter()
        .map(|code| {
            let seed = code.wrapping_mul(2_654_435_761);
            let rows = (0..5)
                .map(|y| {
                    if code == 32 || code == 160 {
                        0
                    } else {
                        (((seed >> (3 * y + 5)) & 0b111) as u8) << 5
                    }
                })
                .collect();
            let descends = char::from_u32(code).is_some_and(|c| DESCENDERS.contains(c));
            FixtureGlyph {
                code_point: code,
                width: 3,
                rows,
                x_offset: 0,
                y_offset: if descends { -1 } else { 0 },
                advance: 4,
            }
        })
        .collect()
}

/// Encode glyphs as BDF 2.1 text.
pub fn bdf_font(name: &str, glyphs: &[FixtureGlyph]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "STARTFONT 2.1");
    let _ = writeln!(out, "COMMENT generated test font");
    let _ = writeln!(out, "FONT -fixture-{}-medium-r-normal--6-60-75-75-c-40-iso10646-1", name);
    let _ = writeln!(out, "SIZE 6 75 75");
    let _ = writeln!(out, "FONTBOUNDINGBOX 3 6 0 -1");
    let _ = writeln!(out, "STARTPROPERTIES 1");
    let _ = writeln!(out, "FAMILY_NAME \"{}\"", name);
    let _ = writeln!(out, "ENDPROPERTIES");
    let _ = writeln!(out, "CHARS {}", glyphs.len());
    for glyph in glyphs {
        let _ = writeln!(out, "STARTCHAR U+{:04X}", glyph.code_point);
        let _ = writeln!(out, "ENCODING {}", glyph.code_point);
        let _ = writeln!(out, "SWIDTH 666 0");
        let _ = writeln!(out, "DWIDTH {} 0", glyph.advance);
        let _ = writeln!(
            out,
            "BBX {} {} {} {}",
            glyph.width,
            glyph.height(),
            glyph.x_offset,
            glyph.y_offset
        );
        let _ = writeln!(out, "BITMAP");
        for row in &glyph.rows {
            let _ = writeln!(out, "{:02X}", row);
        }
        let _ = writeln!(out, "ENDCHAR");
    }
    let _ = writeln!(out, "ENDFONT");
    out
}

/// The tom-thumb-like fixture as BDF.
pub fn tom_thumb_bdf() -> String {
    bdf_font("Tom Thumb", &tom_thumb_glyphs())
}

/// Encode glyphs as big-endian, MSB-first PCF with byte-padded rows.
///
/// Code points must be below 256.
pub fn pcf_font(name: &str, glyphs: &[FixtureGlyph]) -> Vec<u8> {
    let format = PCF_BYTE_ORDER_MSB | PCF_BIT_ORDER_MSB;
    let table_header = |format: u32| {
        let mut table = Vec::new();
        table.write_u32::<LittleEndian>(format).unwrap();
        table
    };

    let mut properties = table_header(format);
    let strings = format!("FAMILY_NAME\0{}\0", name);
    properties.write_u32::<BigEndian>(1).unwrap();
    properties.write_i32::<BigEndian>(0).unwrap();
    properties.write_u8(1).unwrap();
    properties.write_i32::<BigEndian>("FAMILY_NAME\0".len() as i32).unwrap();
    properties.extend([0, 0, 0]);
    properties.write_u32::<BigEndian>(strings.len() as u32).unwrap();
    properties.extend(strings.as_bytes());

    let mut metrics = table_header(format);
    metrics.write_u32::<BigEndian>(glyphs.len() as u32).unwrap();
    for glyph in glyphs {
        let top = glyph.y_offset + glyph.height() as i32;
        for v in [
            glyph.x_offset,
            glyph.x_offset + glyph.width as i32,
            glyph.advance,
            top,
            -glyph.y_offset,
            0,
        ] {
            metrics.write_i16::<BigEndian>(v as i16).unwrap();
        }
    }

    let mut bitmaps = table_header(format);
    bitmaps.write_u32::<BigEndian>(glyphs.len() as u32).unwrap();
    let mut offset = 0u32;
    for glyph in glyphs {
        bitmaps.write_u32::<BigEndian>(offset).unwrap();
        offset += glyph.height();
    }
    // Data sizes for 1, 2, 4 and 8 byte padding; only 1 byte is stored
    for size in [offset, offset * 2, offset * 4, offset * 8] {
        bitmaps.write_u32::<BigEndian>(size).unwrap();
    }
    for glyph in glyphs {
        bitmaps.extend(&glyph.rows);
    }

    let first = glyphs.iter().map(|g| g.code_point).min().unwrap_or(0);
    let last = glyphs.iter().map(|g| g.code_point).max().unwrap_or(0);
    let mut encodings = table_header(format);
    for v in [first as i16, last as i16, 0, 0, 0] {
        encodings.write_i16::<BigEndian>(v).unwrap();
    }
    for code in first..=last {
        let index = glyphs
            .iter()
            .position(|g| g.code_point == code)
            .map_or(0xFFFF, |i| i as u16);
        encodings.write_u16::<BigEndian>(index).unwrap();
    }

    let tables = [
        (PCF_PROPERTIES, properties),
        (PCF_METRICS, metrics),
        (PCF_BITMAPS, bitmaps),
        (PCF_BDF_ENCODINGS, encodings),
    ];
    let mut out = Vec::new();
    out.extend(PCF_MAGIC);
    out.write_u32::<LittleEndian>(tables.len() as u32).unwrap();
    let mut table_offset = 8 + 16 * tables.len() as u32;
    for (kind, table) in &tables {
        for v in [*kind, format, table.len() as u32, table_offset] {
            out.write_u32::<LittleEndian>(v).unwrap();
        }
        table_offset += table.len() as u32;
    }
    for (_, table) in &tables {
        out.extend(table);
    }
    out
}

/// The tom-thumb-like fixture as PCF.
pub fn tom_thumb_pcf() -> Vec<u8> {
    pcf_font("Tom Thumb", &tom_thumb_glyphs())
}

/// Font units per em of [`outline_font`].
pub const OUTLINE_UNITS_PER_EM: u16 = 1000;
/// Ascender of [`outline_font`], in font units.
pub const OUTLINE_ASCENDER: i16 = 800;
/// Descender of [`outline_font`], in font units.
pub const OUTLINE_DESCENDER: i16 = -200;

/// One glyph of a synthetic TrueType font, built from rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineGlyph {
    pub code_point: Option<u32>,
    pub advance: u16,
    /// `[x_min, y_min, x_max, y_max]` in font units, y up from the baseline.
    pub rects: Vec<[i16; 4]>,
}

impl OutlineGlyph {
    fn bounds(&self) -> [i16; 4] {
        self.rects.iter().fold(
            [i16::MAX, i16::MAX, i16::MIN, i16::MIN],
            |[x0, y0, x1, y1], r| [x0.min(r[0]), y0.min(r[1]), x1.max(r[2]), y1.max(r[3])],
        )
    }

    fn glyf_data(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.rects.is_empty() {
            return out;
        }
        out.write_i16::<BigEndian>(self.rects.len() as i16).unwrap();
        for v in self.bounds() {
            out.write_i16::<BigEndian>(v).unwrap();
        }
        for contour in 0..self.rects.len() {
            out.write_u16::<BigEndian>(contour as u16 * 4 + 3).unwrap();
        }
        // No instructions
        out.write_u16::<BigEndian>(0).unwrap();

        let points: Vec<(i16, i16)> = self
            .rects
            .iter()
            .flat_map(|&[x0, y0, x1, y1]| [(x0, y0), (x0, y1), (x1, y1), (x1, y0)])
            .collect();
        // Every point on-curve, coordinates stored as 16-bit deltas
        out.extend(std::iter::repeat(0x01).take(points.len()));
        let mut previous = (0, 0);
        for &(x, _) in &points {
            out.write_i16::<BigEndian>(x - previous.0).unwrap();
            previous.0 = x;
        }
        for &(_, y) in &points {
            out.write_i16::<BigEndian>(y - previous.1).unwrap();
            previous.1 = y;
        }
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }
}

/// Glyphs of [`outline_font`]; the first is `.notdef`.
///
/// Every edge lands on a whole pixel at 10 and 20 points, so rendered
/// coverage is all-or-nothing.
pub fn outline_glyphs() -> Vec<OutlineGlyph> {
    vec![
        // .notdef: blank, 600 units wide
        OutlineGlyph {
            code_point: None,
            advance: 600,
            rects: vec![],
        },
        OutlineGlyph {
            code_point: Some(' ' as u32),
            advance: 300,
            rects: vec![],
        },
        // Stem standing on the baseline
        OutlineGlyph {
            code_point: Some('I' as u32),
            advance: 500,
            rects: vec![[100, 0, 400, 700]],
        },
        // Block hanging below the baseline
        OutlineGlyph {
            code_point: Some('g' as u32),
            advance: 500,
            rects: vec![[100, -200, 400, 300]],
        },
        // Combining acute: zero advance, drawn over the previous glyph
        OutlineGlyph {
            code_point: Some(0x0301),
            advance: 0,
            rects: vec![[-400, 700, -100, 800]],
        },
    ]
}

/// Encode glyphs as a minimal TrueType font with `cmap` (format 12),
/// `glyf`, `head`, `hhea`, `hmtx`, `loca` and `maxp` tables.
///
/// Code points must be in ascending order.
pub fn truetype_font(glyphs: &[OutlineGlyph]) -> Vec<u8> {
    let num_glyphs = glyphs.len() as u16;
    let inked: Vec<[i16; 4]> = glyphs
        .iter()
        .filter(|g| !g.rects.is_empty())
        .map(OutlineGlyph::bounds)
        .collect();
    let font_bounds = inked.iter().fold([0i16; 4], |[x0, y0, x1, y1], r| {
        [x0.min(r[0]), y0.min(r[1]), x1.max(r[2]), y1.max(r[3])]
    });

    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for glyph in glyphs {
        loca.write_u32::<BigEndian>(glyf.len() as u32).unwrap();
        glyf.extend(glyph.glyf_data());
    }
    loca.write_u32::<BigEndian>(glyf.len() as u32).unwrap();

    let mut hmtx = Vec::new();
    for glyph in glyphs {
        let lsb = if glyph.rects.is_empty() { 0 } else { glyph.bounds()[0] };
        hmtx.write_u16::<BigEndian>(glyph.advance).unwrap();
        hmtx.write_i16::<BigEndian>(lsb).unwrap();
    }

    let mapped: Vec<(u32, u16)> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(id, g)| g.code_point.map(|c| (c, id as u16)))
        .collect();
    let mut cmap = Vec::new();
    cmap.write_u16::<BigEndian>(0).unwrap();
    cmap.write_u16::<BigEndian>(1).unwrap();
    // Windows, full Unicode
    cmap.write_u16::<BigEndian>(3).unwrap();
    cmap.write_u16::<BigEndian>(10).unwrap();
    cmap.write_u32::<BigEndian>(12).unwrap();
    cmap.write_u16::<BigEndian>(12).unwrap();
    cmap.write_u16::<BigEndian>(0).unwrap();
    cmap.write_u32::<BigEndian>(16 + 12 * mapped.len() as u32).unwrap();
    cmap.write_u32::<BigEndian>(0).unwrap();
    cmap.write_u32::<BigEndian>(mapped.len() as u32).unwrap();
    for &(code, id) in &mapped {
        cmap.write_u32::<BigEndian>(code).unwrap();
        cmap.write_u32::<BigEndian>(code).unwrap();
        cmap.write_u32::<BigEndian>(u32::from(id)).unwrap();
    }

    let mut head = Vec::new();
    head.write_u32::<BigEndian>(0x0001_0000).unwrap();
    head.write_u32::<BigEndian>(0x0001_0000).unwrap();
    head.write_u32::<BigEndian>(0).unwrap();
    head.write_u32::<BigEndian>(0x5F0F_3CF5).unwrap();
    head.write_u16::<BigEndian>(0x0003).unwrap();
    head.write_u16::<BigEndian>(OUTLINE_UNITS_PER_EM).unwrap();
    head.write_i64::<BigEndian>(0).unwrap();
    head.write_i64::<BigEndian>(0).unwrap();
    for v in font_bounds {
        head.write_i16::<BigEndian>(v).unwrap();
    }
    // macStyle, lowestRecPPEM, fontDirectionHint
    head.write_u16::<BigEndian>(0).unwrap();
    head.write_u16::<BigEndian>(8).unwrap();
    head.write_i16::<BigEndian>(2).unwrap();
    // Long loca offsets, current glyph data format
    head.write_i16::<BigEndian>(1).unwrap();
    head.write_i16::<BigEndian>(0).unwrap();

    let mut hhea = Vec::new();
    hhea.write_u32::<BigEndian>(0x0001_0000).unwrap();
    hhea.write_i16::<BigEndian>(OUTLINE_ASCENDER).unwrap();
    hhea.write_i16::<BigEndian>(OUTLINE_DESCENDER).unwrap();
    hhea.write_i16::<BigEndian>(0).unwrap();
    let max_advance = glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
    hhea.write_u16::<BigEndian>(max_advance).unwrap();
    hhea.write_i16::<BigEndian>(font_bounds[0]).unwrap();
    hhea.write_i16::<BigEndian>(0).unwrap();
    hhea.write_i16::<BigEndian>(font_bounds[2]).unwrap();
    // Upright caret, then four reserved fields and the metric data format
    hhea.write_i16::<BigEndian>(1).unwrap();
    for _ in 0..7 {
        hhea.write_i16::<BigEndian>(0).unwrap();
    }
    hhea.write_u16::<BigEndian>(num_glyphs).unwrap();

    let mut maxp = Vec::new();
    maxp.write_u32::<BigEndian>(0x0000_5000).unwrap();
    maxp.write_u16::<BigEndian>(num_glyphs).unwrap();

    // Records must be sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 7] = [
        (b"cmap", cmap),
        (b"glyf", glyf),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
    ];

    let count = tables.len() as u16;
    let search_range = 16 * (1u16 << (15 - count.leading_zeros()));
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(0x0001_0000).unwrap();
    out.write_u16::<BigEndian>(count).unwrap();
    out.write_u16::<BigEndian>(search_range).unwrap();
    out.write_u16::<BigEndian>(15 - count.leading_zeros() as u16).unwrap();
    out.write_u16::<BigEndian>(count * 16 - search_range).unwrap();

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, table) in &tables {
        out.extend(*tag);
        out.write_u32::<BigEndian>(table_checksum(table)).unwrap();
        out.write_u32::<BigEndian>(offset).unwrap();
        out.write_u32::<BigEndian>(table.len() as u32).unwrap();
        offset += padded_len(table.len()) as u32;
    }
    for (_, table) in &tables {
        out.extend(table);
        out.resize(out.len() + padded_len(table.len()) - table.len(), 0);
    }
    out
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn table_checksum(table: &[u8]) -> u32 {
    table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// The rectangle outline font as TrueType bytes.
pub fn outline_font() -> Vec<u8> {
    truetype_font(&outline_glyphs())
}

/// Encode `(glyph, rows)` pairs as a textfont file.
pub fn textfont(glyphs: &[(&str, &[&str])]) -> String {
    let mut out = String::from("# generated test font\n");
    for (glyph, rows) in glyphs {
        let _ = writeln!(out, "GLYPH: \"{}\"", glyph);
        for row in *rows {
            let _ = writeln!(out, "{}", row);
        }
    }
    out
}
