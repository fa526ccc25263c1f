//! fontknife CLI - Convert fonts to sprite sheets and emit CHIP-8 code
//!
//! This binary provides commands for converting fonts between formats,
//! emitting Octo source for small bitmap fonts and managing the
//! parsed-font cache.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use fontknife_cli::args::{CacheOptions, EmitArgs, OutputArgs, SourceArgs};
use fontknife_cli::{commands, logging};
use fontknife_formats::FormatError;

/// fontknife - Font conversion for sprite sheets and retro targets
#[derive(Parser)]
#[command(name = "fontknife")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Do not read or write the parsed-font cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Directory for the parsed-font cache
    #[arg(long, global = true, env = "FONTKNIFE_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a font to a sprite sheet image or a textfont file
    Convert {
        /// Source font file (- for stdin)
        #[arg(value_name = "INPUT_FONT")]
        input: String,

        /// Output file (- for stdout)
        #[arg(value_name = "OUTPUT_IMAGE")]
        output: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Emit code that draws text with a small bitmap font
    EmitCode {
        /// Source font file (- for stdin)
        #[arg(value_name = "INPUT_FONT")]
        input: String,

        /// Output source file (- for stdout)
        #[arg(value_name = "OUTPUT_ASM")]
        output: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        emit: EmitArgs,
    },

    /// List readable and writable formats
    Formats,

    /// Manage the parsed-font cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Convert { .. } => "convert",
            Commands::EmitCode { .. } => "emit-code",
            Commands::Formats => "formats",
            Commands::Cache { .. } => "cache",
        }
    }
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Clear all cache entries
    Clear,

    /// Show cache information (entry count, total size)
    Info,
}

/// Print the usage line of a subcommand to stderr
fn print_usage(subcommand: &str) {
    let mut cmd = Cli::command();
    cmd.build();
    if let Some(sub) = cmd.find_subcommand_mut(subcommand) {
        eprintln!("{}", sub.render_usage());
    }
}

fn is_format_resolution(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<FormatError>()
            .is_some_and(FormatError::is_format_resolution)
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cache = CacheOptions {
        enabled: !cli.no_cache,
        dir: cli.cache_dir,
    };
    let subcommand = cli.command.name();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            source,
            out,
        } => commands::convert::run(&input, &output, &source, &out, &cache),
        Commands::EmitCode {
            input,
            output,
            source,
            emit,
        } => commands::emit_code::run(&input, &output, &source, &emit, &cache),
        Commands::Formats => commands::formats::run(),
        Commands::Cache { command } => match command {
            CacheCommands::Clear => commands::cache::clear(&cache),
            CacheCommands::Info => commands::cache::info(&cache),
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            if is_format_resolution(&e) {
                print_usage(subcommand);
            }
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
