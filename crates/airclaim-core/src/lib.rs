//! Airclaim base primitives and schemas.

/// Foundational byte codec, hashing and Merkle helpers shared across crates.
pub mod base;
/// Serialized/public schema models used across the workspace.
pub mod schema;
