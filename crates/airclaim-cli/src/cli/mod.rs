//! Command-line interface for the `airclaim` CLI application.

mod config;
pub mod constants;
mod key;
mod proof;

use airclaim_core::base::Hash;
use clap::Parser;
use eyre::{Context as _, Result, eyre};

pub use self::config::ConfigCommands;
pub use self::key::KeyCommands;
pub use self::proof::ProofCommands;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "airclaim")]
#[command(about = "Airdrop snapshot claim tools")]
pub struct Cli {
    /// CLI top-level command group.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Snapshot key utilities.
    Key {
        /// Key subcommands.
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Claim construction and verification.
    Proof {
        /// Proof subcommands.
        #[command(subcommand)]
        command: ProofCommands,
    },
    /// Snapshot tree configuration utilities.
    Config {
        /// Config subcommands.
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Parse a hex-encoded 32-byte tree root.
pub fn parse_hash(s: &str) -> Result<Hash> {
    let bytes = hex::decode(s).context("Invalid hex root")?;
    Hash::try_from(bytes.as_slice())
        .map_err(|_| eyre!("Root must be 32 bytes, got {}", bytes.len()))
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn hash_parse() {
        let root = parse_hash(&"ab".repeat(32)).expect("32-byte root should parse");
        assert_eq!(root, [0xab; 32]);
        assert!(parse_hash("abab").is_err());
        assert!(parse_hash(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn parse_proof_verify_requires_claims() {
        let cli = Cli::try_parse_from(["airclaim", "proof", "verify"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["airclaim", "proof", "verify", "a.json", "b.hex"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn parse_proof_sign_defaults_to_strict_policy() {
        let cli = Cli::try_parse_from(["airclaim", "proof", "sign"]).expect("sign should parse");
        let Commands::Proof {
            command: ProofCommands::Sign { args },
        } = cli.command
        else {
            panic!("expected proof sign");
        };
        assert!(!args.allow_tweaked_ec);
        assert!(args.tweak.is_none());
    }
}
