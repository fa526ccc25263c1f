//! Emit-code command implementation
//!
//! Emits Octo (CHIP-8) source drawing a small bitmap font.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use fontknife_octo::emit_octo;

use super::load_source_font;
use crate::args::{CacheOptions, EmitArgs, SourceArgs};

/// Run the emit-code command
///
/// # Arguments
/// * `input` - Source font path, or `-` for stdin
/// * `output` - Destination path, or `-` for stdout
/// * `source` - How to read the source font
/// * `emit` - Code output settings
/// * `cache` - Parsed-font cache settings
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    input: &str,
    output: &str,
    source: &SourceArgs,
    emit: &EmitArgs,
    cache: &CacheOptions,
) -> Result<ExitCode> {
    let options = emit.octo_options()?;
    let loaded = load_source_font(input, source, cache)?;

    let mut code = Vec::new();
    emit_octo(&mut code, &loaded.font, &options).with_context(|| {
        format!(
            "Failed to emit {} code for {}",
            emit.out_format,
            loaded.source.display_name()
        )
    })?;

    if output == "-" {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(&code).context("Failed to write to stdout")?;
        out.flush().context("Failed to write to stdout")?;
    } else {
        fs::write(output, &code).with_context(|| format!("Failed to write code: {}", output))?;
        println!(
            "{} {} {} {}",
            "SUCCESS".green().bold(),
            loaded.source.display_name(),
            "->".dimmed(),
            output
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontknife_octo::OctoError;
    use tempfile::TempDir;

    #[test]
    fn test_emit_code_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("bar.textfont");
        fs::write(&input, "GLYPH: \"|\"\nX\nX\n").unwrap();
        let output = temp.path().join("font.8o");

        run(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            &SourceArgs::default(),
            &EmitArgs::default(),
            &CacheOptions::disabled(),
        )
        .unwrap();

        let code = fs::read_to_string(&output).unwrap();
        assert!(code.contains(": smallfont_glyph_table 0x80 0x80"), "{code}");
    }

    #[test]
    fn test_oversized_font_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("wide.textfont");
        fs::write(&input, "GLYPH: \"w\"\nXXXXXXXXX\n").unwrap();
        let output = temp.path().join("font.8o");

        let err = run(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            &SourceArgs::default(),
            &EmitArgs::default(),
            &CacheOptions::disabled(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OctoError>(),
            Some(OctoError::TooWide { width: 9, .. })
        ));
        assert!(!output.exists());
    }
}
