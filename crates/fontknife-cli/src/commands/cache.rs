//! Cache management commands

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use crate::args::CacheOptions;
use crate::cache::CacheManager;

/// Clear all cache entries
pub fn clear(options: &CacheOptions) -> Result<ExitCode> {
    let cache_mgr = CacheManager::new(options.dir.clone())?;

    println!("{}", "Clearing parsed-font cache...".cyan().bold());

    let removed = cache_mgr.clear()?;

    if removed == 0 {
        println!("  {}", "No cached fonts".dimmed());
    } else {
        println!(
            "  {} Removed {} cached {}",
            "SUCCESS".green().bold(),
            removed,
            if removed == 1 { "font" } else { "fonts" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Show cache information
pub fn info(options: &CacheOptions) -> Result<ExitCode> {
    let cache_mgr = CacheManager::new(options.dir.clone())?;

    println!("{}", "Cache Information".cyan().bold());

    let stats = cache_mgr.stats()?;

    println!(
        "  {}: {}",
        "Cache directory".dimmed(),
        stats.cache_dir.display()
    );
    println!("  {}: {}", "Cached fonts".dimmed(), stats.font_count);
    println!("  {}: {}", "Cached glyphs".dimmed(), stats.glyph_count);
    println!(
        "  {}: {}",
        "Total size".dimmed(),
        format_size(stats.total_size_bytes)
    );
    if !options.enabled {
        println!("  {}", "Caching is disabled for this run (--no-cache)".dimmed());
    }

    Ok(ExitCode::SUCCESS)
}

fn format_size(bytes: u64) -> String {
    let size_mb = bytes as f64 / (1024.0 * 1024.0);
    if size_mb >= 1.0 {
        format!("{:.2} MB", size_mb)
    } else {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    }
}
