//! HTTP server

pub mod http;

pub use http::{handle_request, route, run, serve, AppState};
