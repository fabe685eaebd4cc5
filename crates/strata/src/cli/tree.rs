//! `strata tree` command implementation.

use super::Context;

/// Run the tree command.
pub fn run(ctx: &Context, file: &str) -> Result<(), strata::Error> {
    let (engine, _) = ctx.load()?;
    println!("{}", engine.dump_tree(file)?);

    Ok(())
}
