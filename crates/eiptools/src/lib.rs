//! eiptools umbrella crate.
//!
//! Re-exports the eiptools components. Use feature flags to pick what you need.

#![doc = include_str!("../README.md")]

pub use eiptools_content as content;
pub use eiptools_core as core;

#[cfg(feature = "catalog")]
pub use eiptools_catalog as catalog;

#[cfg(feature = "graph")]
pub use eiptools_graph as graph;

#[cfg(feature = "webhook")]
pub use eiptools_webhook as webhook;

#[cfg(feature = "api")]
pub use eiptools_api as api;

#[cfg(feature = "cli")]
pub use eiptools_cli as cli;
