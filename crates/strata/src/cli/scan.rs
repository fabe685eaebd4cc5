//! `strata scan` command implementation.

use colored::Colorize;

use super::Context;
use super::display::print_file_errors;

/// Run the scan command.
pub fn run(ctx: &Context) -> Result<(), strata::Error> {
    println!("{} {}...", "Scanning".cyan().bold(), ctx.root.display());

    let (_, stats) = ctx.load()?;

    println!();
    println!("{} {} files", "Parsed".green().bold(), stats.files_parsed);
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    if stats.files_skipped > 0 {
        println!(
            "{}: {} files (unsupported language)",
            "Skipped".yellow(),
            stats.files_skipped
        );
    }

    if stats.entries_excluded > 0 {
        println!(
            "{}: {} entries (exclusion rules)",
            "Excluded".yellow(),
            stats.entries_excluded
        );
    }

    if stats.files_with_syntax_errors > 0 {
        println!(
            "{}: {} files (recovered)",
            "Syntax errors".yellow(),
            stats.files_with_syntax_errors
        );
    }

    print_file_errors(&stats.errors);

    Ok(())
}
