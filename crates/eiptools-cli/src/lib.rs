//! # eiptools-cli
//!
//! The `eiptools` command.
//!
//! - `serve`: the HTTP server with document pages, graph API and cast webhook
//! - `index`: rebuild the catalog files from local checkouts
//! - `graph`: build the reference graph artifact and query it
//! - `show`: print one document
//! - `bookmarks`: a local reading list with share links
//! - `webhook`: send a signed test cast, or register the webhook
//! - `config`: inspect and edit the configuration file

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command};
pub use config::EipToolsConfig;
pub use error::{Error, Result};
