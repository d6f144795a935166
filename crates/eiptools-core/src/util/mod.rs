//! Utility modules for document numbers, IDs, paths and JSON files.
//!
//! # Modules
//!
//! - [`files`]: Atomic JSON writes and tolerant reads
//! - [`ids`]: Document number parsing and graph ID computation
//! - [`paths`]: Tilde expansion and platform config locations

pub mod files;
pub mod ids;
pub mod paths;
