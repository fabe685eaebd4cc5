//! CLI command implementations.

mod display;

pub mod report;
pub mod scan;
pub mod symbols;
pub mod tree;

use std::path::PathBuf;

use strata::{BuildOptions, ScanConfig, SnapshotStats, Strata};

/// Settings shared by every command.
pub struct Context {
    /// Project root
    pub root: PathBuf,
    /// Optional YAML configuration file
    pub config: Option<PathBuf>,
    /// Parse on the rayon pool
    pub parallel: bool,
}

impl Context {
    /// Build an engine and parse the project.
    pub fn load(&self) -> Result<(Strata, SnapshotStats), strata::Error> {
        let config = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };

        let mut engine = Strata::new(config);
        let options = BuildOptions {
            parallel: self.parallel,
            cancel: None,
        };
        let stats = engine.set_ast_with_options(&self.root, &options)?;

        Ok((engine, stats))
    }
}
