//! HTTP server for eiptools.
//!
//! - [`create_router`]: document pages, redirects, the graph API, the
//!   catalog and shared-list endpoints, and the signed webhook route
//! - [`AppState`]: catalogs, graph, and markdown source shared by handlers
//! - [`serve`]: bind and run until Ctrl-C
//! - [`ApiError`]: handler errors rendered as JSON

#![forbid(unsafe_code)]

pub mod error;
pub mod page;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
