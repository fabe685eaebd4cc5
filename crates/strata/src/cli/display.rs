//! Common display utilities for CLI commands.

use colored::Colorize;
use strata::{FileError, SymbolKind, SymbolRecord};

const MAX_DISPLAY_ERRORS: usize = 5;

/// Print per-file errors, truncated after a few entries.
pub fn print_file_errors(errors: &[FileError]) {
    if errors.is_empty() {
        return;
    }

    let unreadable = errors.iter().filter(|err| err.kind.is_read_error()).count();

    println!();
    if unreadable > 0 {
        println!(
            "{} ({}, {} unreadable):",
            "Errors".red().bold(),
            errors.len(),
            unreadable
        );
    } else {
        println!("{} ({}):", "Errors".red().bold(), errors.len());
    }
    for err in errors.iter().take(MAX_DISPLAY_ERRORS) {
        println!(
            "  {} {}: {} ({})",
            "•".red(),
            err.path.display(),
            err.message,
            err.kind
        );
    }
    if errors.len() > MAX_DISPLAY_ERRORS {
        println!("  ... and {} more", errors.len() - MAX_DISPLAY_ERRORS);
    }
}

/// Print one symbol with its members.
pub fn print_symbol(symbol: &SymbolRecord) {
    let kind = match symbol.kind {
        SymbolKind::Class => symbol.kind.label().cyan(),
        SymbolKind::Interface => symbol.kind.label().magenta(),
        SymbolKind::Function => symbol.kind.label().green(),
    };

    match &symbol.supertype {
        Some(supertype) => println!(
            "  {} {} {} {}",
            kind,
            symbol.name.white().bold(),
            "extends".dimmed(),
            supertype
        ),
        None => println!("  {} {}", kind, symbol.name.white().bold()),
    }

    for property in &symbol.properties {
        println!("    {} {}", "•".dimmed(), property);
    }
    for method in &symbol.methods {
        let return_type = method
            .return_type
            .as_deref()
            .unwrap_or(strata::DEFAULT_RETURN_TYPE);
        println!(
            "    {} {}(): {}",
            "•".dimmed(),
            method.name,
            return_type.dimmed()
        );
    }
}
