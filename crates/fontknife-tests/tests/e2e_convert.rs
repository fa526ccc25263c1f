//! End-to-end tests for `fontknife convert`.
//!
//! These call the command implementations directly, the same code path the
//! binary uses after argument parsing.

use fontknife_cli::args::{CacheOptions, OutputArgs, SourceArgs};
use fontknife_cli::commands::convert;
use fontknife_font::GridSpec;
use fontknife_formats::{load_font, FontSource, LoadOptions, SourceFormat};
use fontknife_tests::fixtures::{tom_thumb_bdf, tom_thumb_codes, tom_thumb_glyphs, tom_thumb_pcf};
use fontknife_tests::{verify_determinism, FontFixture};
use pretty_assertions::assert_eq;

fn convert(fixture: &FontFixture, input: &str, output: &str, out: &OutputArgs) {
    convert::run(
        &fixture.file(input),
        &fixture.file(output),
        &SourceArgs::default(),
        out,
        &CacheOptions::disabled(),
    )
    .expect("convert should succeed");
}

fn png_size(data: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(std::io::Cursor::new(data));
    let reader = decoder.read_info().expect("valid PNG");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn test_tom_thumb_sheet_dimensions() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    convert(&fixture, "tom-thumb.bdf", "sheet.png", &OutputArgs::default());

    // 16 columns of 4x6 tiles, 191 glyphs -> 12 rows
    assert_eq!(png_size(&fixture.read("sheet.png")), (64, 72));
}

#[test]
fn test_tom_thumb_sheet_pixels() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    convert(&fixture, "tom-thumb.bdf", "sheet.png", &OutputArgs::default());

    let sheet = image::load_from_memory(&fixture.read("sheet.png"))
        .expect("decodable sheet")
        .to_rgba8();
    let glyphs = tom_thumb_glyphs();
    for (index, glyph) in glyphs.iter().enumerate() {
        let (col, row) = ((index % 16) as u32, (index / 16) as u32);
        // Non-descending ink sits on the top five rows of the cell
        let top = if glyph.y_offset < 0 { 1 } else { 0 };
        for y in 0..5 {
            for x in 0..4 {
                let pixel = sheet.get_pixel(col * 4 + x, row * 6 + top + y);
                let expected = if glyph.ink(x, y) { 255 } else { 0 };
                assert_eq!(
                    pixel.0,
                    [expected, expected, expected, 255],
                    "glyph U+{:04X} at ({x}, {y})",
                    glyph.code_point
                );
            }
        }
    }
}

#[test]
fn test_sheet_output_is_deterministic() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    let mut run = 0;
    let result = verify_determinism(
        || {
            run += 1;
            let output = format!("sheet-{}.png", run);
            convert(&fixture, "tom-thumb.bdf", &output, &OutputArgs::default());
            fixture.read(&output)
        },
        3,
    );

    assert!(result.is_deterministic, "{:?}", result.first_difference);
}

#[test]
fn test_bdf_and_pcf_load_identically() {
    let fixture = FontFixture::new();
    let bdf = fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    let pcf = fixture.write("tom-thumb.pcf", tom_thumb_pcf());

    let from_bdf = load_font(&FontSource::Path(bdf), None, &LoadOptions::default()).unwrap();
    let from_pcf = load_font(&FontSource::Path(pcf), None, &LoadOptions::default()).unwrap();

    assert_eq!(from_bdf.provided_glyphs(), from_pcf.provided_glyphs());
    assert_eq!(from_bdf.max_glyph_size(), from_pcf.max_glyph_size());
    for key in from_bdf.provided_glyphs() {
        assert_eq!(
            from_bdf.get_glyph(&key, true).unwrap(),
            from_pcf.get_glyph(&key, true).unwrap(),
            "glyph {key:?}"
        );
    }
    assert_eq!(
        from_pcf.metadata().get("FAMILY_NAME").map(String::as_str),
        Some("Tom Thumb")
    );
}

#[test]
fn test_pcf_and_bdf_sheets_match() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    fixture.write("tom-thumb.pcf", tom_thumb_pcf());

    convert(&fixture, "tom-thumb.bdf", "bdf.png", &OutputArgs::default());
    convert(&fixture, "tom-thumb.pcf", "pcf.png", &OutputArgs::default());

    assert_eq!(fixture.read("bdf.png"), fixture.read("pcf.png"));
}

#[test]
fn test_textfont_round_trip_preserves_sheet() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    convert(&fixture, "tom-thumb.bdf", "direct.png", &OutputArgs::default());
    convert(&fixture, "tom-thumb.bdf", "tom-thumb.textfont", &OutputArgs::default());
    convert(&fixture, "tom-thumb.textfont", "via-textfont.png", &OutputArgs::default());

    let text = String::from_utf8(fixture.read("tom-thumb.textfont")).unwrap();
    assert!(text.contains("# Max dimensions   : 4x6 px"), "{text}");
    assert_eq!(fixture.read("direct.png"), fixture.read("via-textfont.png"));
}

#[test]
fn test_sheet_round_trip_through_spritesheet_reader() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    convert(&fixture, "tom-thumb.bdf", "sheet.png", &OutputArgs::default());

    let glyphs: Vec<String> = tom_thumb_codes()
        .into_iter()
        .map(|code| char::from_u32(code).unwrap().to_string())
        .collect();
    let options = LoadOptions::default()
        .with_glyph_sequence(glyphs)
        .with_grid(GridSpec::new().with_tile_size_px((4, 6)));
    let sheet = load_font(
        &FontSource::Path(fixture.path().join("sheet.png")),
        Some(SourceFormat::SpriteSheetGrid),
        &options,
    )
    .unwrap();
    let bdf = load_font(
        &FontSource::Path(fixture.path().join("tom-thumb.bdf")),
        None,
        &LoadOptions::default(),
    )
    .unwrap();

    assert_eq!(sheet.provided_glyphs(), bdf.provided_glyphs());
    for key in bdf.provided_glyphs() {
        assert_eq!(
            sheet.get_glyph(&key, true).unwrap(),
            bdf.get_glyph(&key, true).unwrap(),
            "glyph {key:?}"
        );
    }
}

#[test]
fn test_scaled_colored_sheet() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    let out = OutputArgs {
        out_sheet_scale: 2,
        out_background_color: "#102030".parse().unwrap(),
        ..OutputArgs::default()
    };

    convert(&fixture, "tom-thumb.bdf", "big.png", &out);

    let sheet = image::load_from_memory(&fixture.read("big.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(sheet.dimensions(), (128, 144));
    // The space glyph fills the first tile with background
    assert_eq!(sheet.get_pixel(0, 0).0, [0x10, 0x20, 0x30, 255]);
}

#[test]
fn test_cached_conversion_matches_uncached() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    let cache = CacheOptions::in_dir(fixture.path().join("cache"));

    for output in ["first.png", "second.png"] {
        convert::run(
            &fixture.file("tom-thumb.bdf"),
            &fixture.file(output),
            &SourceArgs::default(),
            &OutputArgs::default(),
            &cache,
        )
        .unwrap();
    }
    convert(&fixture, "tom-thumb.bdf", "uncached.png", &OutputArgs::default());

    assert_eq!(fixture.read("first.png"), fixture.read("second.png"));
    assert_eq!(fixture.read("second.png"), fixture.read("uncached.png"));
}

#[test]
fn test_stdin_needs_source_format() {
    let fixture = FontFixture::new();
    let err = convert::run(
        "-",
        &fixture.file("sheet.png"),
        &SourceArgs::default(),
        &OutputArgs::default(),
        &CacheOptions::disabled(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "You must specify a source format when piping from stdin."
    );
}
