//! Key subcommands.

use std::path::PathBuf;

use super::constants::{
    AIRCLAIM_KEY_FILE, AIRCLAIM_KEY_OUT, AIRCLAIM_TWEAK_OUT, DEFAULT_BLINDED_KEY_FILE,
    DEFAULT_KEY_FILE, DEFAULT_TWEAK_FILE,
};

/// Arguments for `airclaim key address`.
#[derive(Debug, clap::Args)]
pub struct AddressArgs {
    /// Bech32 witness address the grant pays to.
    #[arg(long)]
    pub address: String,
    /// Granted amount.
    #[arg(long)]
    pub value: u64,
    /// Grant pays the sponsor fee instead of the recipient fee.
    #[arg(long, default_value_t = false)]
    pub sponsor: bool,
    /// Output file for the key JSON.
    #[arg(long, env = AIRCLAIM_KEY_OUT, default_value = DEFAULT_KEY_FILE)]
    pub output: PathBuf,
}

/// Arguments for `airclaim key blind`.
#[derive(Debug, clap::Args)]
pub struct BlindArgs {
    /// Snapshot key JSON to blind.
    #[arg(long, env = AIRCLAIM_KEY_FILE, default_value = DEFAULT_KEY_FILE)]
    pub key: PathBuf,
    /// Output file for the blinded key JSON.
    #[arg(long, env = AIRCLAIM_KEY_OUT, default_value = DEFAULT_BLINDED_KEY_FILE)]
    pub key_out: PathBuf,
    /// Output file for the tweak (hex, owner-only permissions).
    #[arg(long, env = AIRCLAIM_TWEAK_OUT, default_value = DEFAULT_TWEAK_FILE)]
    pub tweak_out: PathBuf,
}

/// Key command group.
#[derive(Debug, clap::Subcommand)]
pub enum KeyCommands {
    /// Build an address-grant key from a bech32 address.
    Address {
        #[command(flatten)]
        args: AddressArgs,
    },
    /// Blind a snapshot key and keep the tweak needed to sign with it.
    Blind {
        #[command(flatten)]
        args: BlindArgs,
    },
}
