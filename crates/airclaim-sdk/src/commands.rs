//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

mod config;
mod key;
mod proof;
mod sensitive_output;

pub use config::{config_check, snapshot_config_schema};
pub use key::{key_address, key_blind};
pub use proof::{ClaimSummary, SigningInputs, proof_inspect, proof_sign, proof_verify};
