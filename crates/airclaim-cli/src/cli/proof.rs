//! Proof subcommands.

use std::path::PathBuf;

use airclaim_core::base::Hash;

use super::constants::{
    AIRCLAIM_ALLOW_TWEAKED_EC, AIRCLAIM_CONFIG_FILE, AIRCLAIM_EXPECTED_ROOT, AIRCLAIM_KEY_FILE,
    AIRCLAIM_ORIGIN_FILE, AIRCLAIM_PROOF_FILE, AIRCLAIM_PROOF_OUT, AIRCLAIM_SECRET_FILE,
    AIRCLAIM_SUMMARY_OUT, AIRCLAIM_TWEAK_FILE, DEFAULT_CONFIG_FILE, DEFAULT_KEY_FILE,
    DEFAULT_PROOF_FILE, DEFAULT_SECRET_FILE, DEFAULT_SIGNED_PROOF_FILE,
};
use super::parse_hash;

/// Arguments for `airclaim proof inspect`.
#[derive(Debug, clap::Args)]
pub struct InspectArgs {
    /// Claim file, JSON or hex.
    #[arg(long, env = AIRCLAIM_PROOF_FILE, default_value = DEFAULT_PROOF_FILE)]
    pub proof: PathBuf,
    /// Snapshot tree configuration file.
    #[arg(long, env = AIRCLAIM_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Write the summary here instead of stdout.
    #[arg(long, env = AIRCLAIM_SUMMARY_OUT)]
    pub output: Option<PathBuf>,
}

/// Arguments for `airclaim proof sign`.
#[derive(Debug, clap::Args)]
pub struct SignArgs {
    /// Unsigned claim file, JSON or hex.
    #[arg(long, env = AIRCLAIM_PROOF_FILE, default_value = DEFAULT_PROOF_FILE)]
    pub proof: PathBuf,
    /// Key JSON the claim was built for.
    #[arg(long, env = AIRCLAIM_KEY_FILE, default_value = DEFAULT_KEY_FILE)]
    pub key: PathBuf,
    /// Secret-key JSON.
    #[arg(long, env = AIRCLAIM_SECRET_FILE, default_value = DEFAULT_SECRET_FILE)]
    pub secret: PathBuf,
    /// Tweak returned by `key blind`. Required for blinded keys.
    #[arg(long, env = AIRCLAIM_TWEAK_FILE)]
    pub tweak: Option<PathBuf>,
    /// RSA key JSON a GOO key was blinded from.
    #[arg(long, env = AIRCLAIM_ORIGIN_FILE)]
    pub origin: Option<PathBuf>,
    /// Allow signing with a blinded elliptic-curve key.
    #[arg(long, env = AIRCLAIM_ALLOW_TWEAKED_EC, default_value_t = false)]
    pub allow_tweaked_ec: bool,
    /// Output file for the signed claim JSON.
    #[arg(long, env = AIRCLAIM_PROOF_OUT, default_value = DEFAULT_SIGNED_PROOF_FILE)]
    pub output: PathBuf,
}

/// Arguments for `airclaim proof verify`.
#[derive(Debug, clap::Args)]
pub struct VerifyArgs {
    /// Claim files, JSON or hex.
    #[arg(required = true)]
    pub proofs: Vec<PathBuf>,
    /// Snapshot tree configuration file.
    #[arg(long, env = AIRCLAIM_CONFIG_FILE, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Root every claim must verify against, hex. Defaults to the configured tree root.
    #[arg(long, env = AIRCLAIM_EXPECTED_ROOT, value_parser = parse_hash)]
    pub expected_root: Option<Hash>,
}

/// Proof command group.
#[derive(Debug, clap::Subcommand)]
pub enum ProofCommands {
    /// Summarise a claim: key type, value, fee, size and bound checks.
    Inspect {
        #[command(flatten)]
        args: InspectArgs,
    },
    /// Sign a claim with the key it was built for.
    Sign {
        #[command(flatten)]
        args: SignArgs,
    },
    /// Verify claims against the snapshot trees.
    Verify {
        #[command(flatten)]
        args: VerifyArgs,
    },
}
