//! HTTP routes served outside the transport adapter

pub mod health;

pub use health::{health_check, HealthResponse};
