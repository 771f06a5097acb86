//! Serde helpers for chain values sent to external APIs

pub mod uint256;
