//! Shared types, errors, and utilities for eiptools.
//!
//! This crate provides the foundational types used across all eiptools
//! crates. It has no internal eiptools dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`kind`]: Document kinds (EIP, RIP, CAIP) and upstream locations
//! - [`service`]: Service lifecycle state
//! - [`traits`]: Configuration management trait
//! - [`util`]: Document number, ID, path, and JSON file utilities

pub mod error;
pub mod kind;
pub mod service;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use kind::DocKind;
pub use traits::ConfigManager;

// Convenience re-exports from util
pub use util::ids::{extract_doc_number, node_id, parse_node_id};
