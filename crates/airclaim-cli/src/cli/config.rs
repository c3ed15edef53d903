//! Config subcommands.

use std::path::PathBuf;

use super::constants::{AIRCLAIM_CONFIG_FILE, DEFAULT_CONFIG_FILE};

/// Config command group.
#[derive(Debug, clap::Subcommand)]
pub enum ConfigCommands {
    /// Print the JSON schema of the snapshot tree configuration.
    Schema,
    /// Load a snapshot tree configuration and check it is consistent.
    Check {
        /// Snapshot tree configuration file.
        #[arg(long, env = AIRCLAIM_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}
