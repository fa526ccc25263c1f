//! End-to-end tests for `fontknife emit-code`.

use fontknife_cli::args::{CacheOptions, EmitArgs, SourceArgs};
use fontknife_cli::commands::emit_code;
use fontknife_octo::OctoError;
use fontknife_tests::fixtures::{bdf_font, textfont, tom_thumb_bdf, tom_thumb_glyphs, FixtureGlyph};
use fontknife_tests::FontFixture;
use pretty_assertions::assert_eq;

fn emit(fixture: &FontFixture, input: &str, output: &str, args: &EmitArgs) -> anyhow::Result<String> {
    emit_code::run(
        &fixture.file(input),
        &fixture.file(output),
        &SourceArgs::default(),
        args,
        &CacheOptions::disabled(),
    )?;
    Ok(String::from_utf8(fixture.read(output)).expect("UTF-8 code"))
}

/// Bytes of a data table, including its continuation lines.
fn table_bytes(code: &str, label: &str) -> Vec<u8> {
    let header = format!(": {} ", label);
    let mut lines = code.lines().skip_while(|line| !line.starts_with(&header));
    let mut bytes = Vec::new();
    if let Some(first) = lines.next() {
        let continuation = lines.take_while(|line| line.starts_with(' '));
        for line in std::iter::once(&first[header.len()..]).chain(continuation) {
            for token in line.split_whitespace() {
                let hex = token.trim_start_matches("0x");
                bytes.push(u8::from_str_radix(hex, 16).expect("hex byte"));
            }
        }
    }
    bytes
}

#[test]
fn test_digits_from_tom_thumb() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    let args = EmitArgs {
        out_glyph_sequence: Some("0123456789".to_string()),
        ..EmitArgs::default()
    };

    let code = emit(&fixture, "tom-thumb.bdf", "digits.8o", &args).unwrap();

    assert!(code.contains("# Font: smallfont  Table glyphs in order: 0123456789\n"));
    assert!(code.contains("  v0 += 208\n"));
    assert!(code.contains("  sprite v1 v2 6\n"));
    assert_eq!(table_bytes(&code, "smallfont_width_table"), vec![4; 10]);

    let expected: Vec<u8> = tom_thumb_glyphs()
        .iter()
        .filter(|g| (48..=57).contains(&g.code_point))
        .flat_map(|g| g.rows.iter().copied().chain(std::iter::once(0)))
        .collect();
    assert_eq!(table_bytes(&code, "smallfont_glyph_table"), expected);
}

#[test]
fn test_full_tom_thumb_table() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());

    let code = emit(&fixture, "tom-thumb.bdf", "font.8o", &EmitArgs::default()).unwrap();

    assert!(code.contains("# Must not be called with v0 < 32 or v0 > 255!\n"));
    // 32..=255, gaps filled with the tofu glyph
    assert_eq!(table_bytes(&code, "smallfont_width_table").len(), 224);
    assert_eq!(table_bytes(&code, "smallfont_glyph_table").len(), 224 * 6);
}

#[test]
fn test_label_prefix_option() {
    let fixture = FontFixture::new();
    fixture.write("bar.textfont", textfont(&[("|", &["X", "X"])]));
    let args = EmitArgs {
        out_label_prefix: "bar".to_string(),
        ..EmitArgs::default()
    };

    let code = emit(&fixture, "bar.textfont", "bar.8o", &args).unwrap();

    assert!(code.contains(": bar_draw_glyph\n"));
    assert_eq!(table_bytes(&code, "bar_glyph_table"), vec![0x80, 0x80]);
}

#[test]
fn test_oversized_font_rejected() {
    let fixture = FontFixture::new();
    let wide = FixtureGlyph {
        code_point: 'W' as u32,
        width: 8,
        rows: vec![0xFF; 5],
        x_offset: 0,
        y_offset: 0,
        advance: 9,
    };
    fixture.write("wide.bdf", bdf_font("Wide", &[wide]));

    let err = emit(&fixture, "wide.bdf", "wide.8o", &EmitArgs::default()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OctoError>(),
        Some(OctoError::TooWide { width: 9, max: 8 })
    ));
    assert!(!fixture.path().join("wide.8o").exists());
}

#[test]
fn test_glyph_outside_table_rejected() {
    let fixture = FontFixture::new();
    fixture.write("tom-thumb.bdf", tom_thumb_bdf());
    let args = EmitArgs {
        out_glyph_sequence: Some("a€".to_string()),
        ..EmitArgs::default()
    };

    let err = emit(&fixture, "tom-thumb.bdf", "font.8o", &args).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OctoError>(),
        Some(OctoError::UnaddressableGlyph(glyph)) if glyph == "€"
    ));
}
