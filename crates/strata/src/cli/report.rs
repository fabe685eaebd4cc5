//! `strata report` command implementation.

use std::path::Path;

use colored::Colorize;

use super::Context;

/// Run the report command.
pub fn run(ctx: &Context, output: Option<&Path>) -> Result<(), strata::Error> {
    let (engine, _) = ctx.load()?;
    let report = engine.extract_all_symbols()?;

    match output {
        Some(path) => {
            std::fs::write(path, &report)?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => print!("{report}"),
    }

    Ok(())
}
