//! Serialized schema/data contracts.

/// Snapshot tree configuration schema types.
pub mod config;
