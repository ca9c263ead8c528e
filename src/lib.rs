//! Problems store - read-only problem catalog over HTTP
//!
//! The catalog is loaded once at startup and answered through three
//! operations: list all problems, fetch one by id, and report health.
//!
//! ## Layers
//!
//! - **Catalog**: immutable in-memory problems, decoded from a JSON array
//! - **Service**: read operations over the catalog
//! - **Endpoint**: uniform `(Context, Request) -> Response` wrapper per operation
//! - **Middleware**: decorators around endpoints (call logging)
//! - **Transport**: HTTP decode / invoke / encode per route

pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod logging;
pub mod routes;
pub mod server;
pub mod service;
pub mod transport;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, StoreError};
