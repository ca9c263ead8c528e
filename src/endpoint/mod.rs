//! Endpoint layer
//!
//! An endpoint is the uniform calling convention between transport and
//! business logic: a typed request goes in with a [`Context`], a typed
//! response comes out. Each endpoint wraps exactly one query service
//! operation, so transports and middleware can treat every operation alike.
//!
//! Business outcomes (not found, empty catalog) are carried inside the
//! response value. The `Err` side of [`Endpoint::call`] is reserved for
//! faults the response cannot express, such as cancellation.

pub mod context;
pub mod middleware;
pub mod problems;

pub use context::Context;
pub use middleware::{Chain, LoggingMiddleware, Middleware};
pub use problems::{
    Endpoints, HealthCheckEndpoint, HealthCheckRequest, HealthCheckResponse, ProblemEndpoint,
    ProblemRequest, ProblemResponse, ProblemsEndpoint, ProblemsRequest, ProblemsResponse,
};

use std::sync::Arc;

use crate::types::Result;

/// A single transport-agnostic operation
#[async_trait::async_trait]
pub trait Endpoint<Req, Resp>: Send + Sync {
    async fn call(&self, ctx: &Context, request: Req) -> Result<Resp>;
}

/// Shared, type-erased endpoint
pub type BoxEndpoint<Req, Resp> = Arc<dyn Endpoint<Req, Resp>>;

/// Business-level outcome carried by a response value
pub trait Outcome {
    /// The business error, if the operation did not succeed
    fn business_error(&self) -> Option<&str>;
}
