//! Formats command implementation
//!
//! Lists the font formats fontknife reads and writes.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use fontknife_formats::{OutputFormat, SourceFormat};

use crate::args::OCTO_CHIP8;

fn extension_list(extensions: &[&str]) -> String {
    extensions
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rows of (name, extensions) for every readable format.
pub fn source_rows() -> Vec<(&'static str, String)> {
    SourceFormat::ALL
        .iter()
        .map(|format| (format.name(), extension_list(format.extensions())))
        .collect()
}

/// Rows of (name, extensions) for every writable format.
pub fn output_rows() -> Vec<(&'static str, String)> {
    OutputFormat::ALL
        .iter()
        .map(|format| (format.name(), extension_list(format.extensions())))
        .collect()
}

/// Run the formats command
pub fn run() -> Result<ExitCode> {
    println!("{}", "Source formats (-F / --src-format)".cyan().bold());
    for (name, extensions) in source_rows() {
        println!("  {} {}", format!("{:<18}", name).bold(), extensions.dimmed());
    }

    println!();
    println!("{}", "Output formats (-f / --out-format)".cyan().bold());
    for (name, extensions) in output_rows() {
        println!("  {} {}", format!("{:<18}", name).bold(), extensions.dimmed());
    }

    println!();
    println!("{}", "Code formats (emit-code -f)".cyan().bold());
    println!("  {} {}", format!("{:<18}", OCTO_CHIP8).bold(), ".8o".dimmed());

    Ok(ExitCode::SUCCESS)
}
