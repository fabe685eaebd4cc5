//! Strata CLI - Source symbol extraction from the command line.
//!
//! Strata parses PHP, JavaScript and TypeScript projects with tree-sitter and
//! prints the classes, interfaces and functions they declare.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Strata: multi-language source symbol extraction.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// YAML configuration file (defaults to built-in exclusions)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Parse files in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the project and show build statistics
    Scan,

    /// Show the symbols declared in one file
    Symbols {
        /// File path relative to the project root
        file: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render the structure report for the whole project
    Report {
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the syntax tree of one file as an S-expression
    Tree {
        /// File path relative to the project root
        file: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = match cli.root {
        Some(r) => r,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let ctx = cli::Context {
        root,
        config: cli.config,
        parallel: cli.parallel,
    };

    let result = match cli.command {
        Commands::Scan => cli::scan::run(&ctx),
        Commands::Symbols { file, json } => cli::symbols::run(&ctx, &file, json),
        Commands::Report { output } => cli::report::run(&ctx, output.as_deref()),
        Commands::Tree { file } => cli::tree::run(&ctx, &file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
