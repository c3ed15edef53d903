//! Snapshot tree configuration commands.

use std::path::Path;

use airclaim_core::schema::config::SnapshotTreeConfig;
use tracing::info;

use crate::common::load_snapshot_config;

/// Print the JSON schema for [`SnapshotTreeConfig`].
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn snapshot_config_schema() -> eyre::Result<()> {
    let schema = schemars::schema_for!(SnapshotTreeConfig);
    let schema_str = serde_json::to_string_pretty(&schema)?;
    println!("Snapshot Tree Configuration JSON Schema:\n{schema_str}");
    Ok(())
}

/// Load and validate a snapshot configuration file.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
pub async fn config_check(path: &Path) -> eyre::Result<SnapshotTreeConfig> {
    let config = load_snapshot_config(path).await?;
    info!(
        airdrop_leaves = config.airdrop.leaves,
        airdrop_subleaves = config.airdrop.subleaves,
        faucet_leaves = config.faucet.leaves,
        reward = config.airdrop.reward,
        "Snapshot configuration is valid"
    );
    Ok(config)
}
