//! Convert command implementation
//!
//! Converts a font into a sprite sheet image or a textfont file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use fontknife_formats::{write_font, FontDestination, OutputFormat};

use super::load_source_font;
use crate::args::{CacheOptions, OutputArgs, SourceArgs};

/// Run the convert command
///
/// # Arguments
/// * `input` - Source font path, or `-` for stdin
/// * `output` - Destination path, or `-` for stdout
/// * `source` - How to read the source font
/// * `out` - How to write the result
/// * `cache` - Parsed-font cache settings
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    input: &str,
    output: &str,
    source: &SourceArgs,
    out: &OutputArgs,
    cache: &CacheOptions,
) -> Result<ExitCode> {
    let destination = FontDestination::from_arg(output);
    let format = OutputFormat::resolve(&destination, out.out_format)?;
    let mut options = out.write_options()?;

    let loaded = load_source_font(input, source, cache)?;
    if loaded.cached {
        options = options.with_source_path(loaded.source.display_name());
    }

    write_font(&loaded.font, &destination, Some(format), &options).with_context(|| {
        format!(
            "Failed to write {} output: {}",
            format,
            destination.display_name()
        )
    })?;

    if let FontDestination::Path(path) = &destination {
        println!(
            "{} {} {} {} ({} glyphs{})",
            "SUCCESS".green().bold(),
            loaded.source.display_name(),
            "->".dimmed(),
            path.display(),
            loaded.font.len(),
            if loaded.cached { ", cached" } else { "" }
        );
    }

    Ok(ExitCode::SUCCESS)
}
