//! SDK/library workflow logic for airclaim.
//!
//! Each command reads its inputs from files, runs the corresponding key or
//! proof operation and writes its outputs back to files.

/// Application command implementations.
pub mod commands;
/// Input loading shared by the commands.
pub mod common;
