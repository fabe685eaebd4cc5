//! `strata symbols` command implementation.

use colored::Colorize;

use super::Context;
use super::display::print_symbol;

/// Run the symbols command.
pub fn run(ctx: &Context, file: &str, json: bool) -> Result<(), strata::Error> {
    let (engine, _) = ctx.load()?;
    let symbols = engine.extract_symbols(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&symbols)?);
        return Ok(());
    }

    println!("{}:", symbols.file.white().bold());
    if symbols.is_empty() {
        println!("  {}", "No symbols found".dimmed());
        return Ok(());
    }

    for symbol in &symbols.symbols {
        print_symbol(symbol);
    }

    Ok(())
}
