//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Common
pub const AIRCLAIM_CONFIG_FILE: &str = "AIRCLAIM_CONFIG_FILE";
pub const AIRCLAIM_ALLOW_TWEAKED_EC: &str = "AIRCLAIM_ALLOW_TWEAKED_EC";

// Key
pub const AIRCLAIM_KEY_FILE: &str = "AIRCLAIM_KEY_FILE";
pub const AIRCLAIM_KEY_OUT: &str = "AIRCLAIM_KEY_OUT";
pub const AIRCLAIM_TWEAK_FILE: &str = "AIRCLAIM_TWEAK_FILE";
pub const AIRCLAIM_TWEAK_OUT: &str = "AIRCLAIM_TWEAK_OUT";
pub const AIRCLAIM_SECRET_FILE: &str = "AIRCLAIM_SECRET_FILE";
pub const AIRCLAIM_ORIGIN_FILE: &str = "AIRCLAIM_ORIGIN_FILE";

// Proof
pub const AIRCLAIM_PROOF_FILE: &str = "AIRCLAIM_PROOF_FILE";
pub const AIRCLAIM_PROOF_OUT: &str = "AIRCLAIM_PROOF_OUT";
pub const AIRCLAIM_SUMMARY_OUT: &str = "AIRCLAIM_SUMMARY_OUT";
pub const AIRCLAIM_EXPECTED_ROOT: &str = "AIRCLAIM_EXPECTED_ROOT";

// -------------------------
// Default values
// -------------------------

// File paths
pub const DEFAULT_CONFIG_FILE: &str = "snapshot-trees.json";
pub const DEFAULT_KEY_FILE: &str = "key.json";
pub const DEFAULT_BLINDED_KEY_FILE: &str = "key-blinded.json";
pub const DEFAULT_TWEAK_FILE: &str = "tweak.hex";
pub const DEFAULT_SECRET_FILE: &str = "secret-key.json";
pub const DEFAULT_PROOF_FILE: &str = "claim.json";
pub const DEFAULT_SIGNED_PROOF_FILE: &str = "claim-signed.json";
