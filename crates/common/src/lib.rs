//! Shared types and utilities for bucketfs.
//!
//! This crate provides functionality used across the bucketfs crates:
//! - Size constants and memory tier defaults
//! - Object path normalization for the path cache

pub mod constants;
pub mod path_utils;

// Re-export commonly used items at crate root
pub use constants::*;
pub use path_utils::{is_strict_descendant, join_components, normalize_path, split_path, Components};
