//! Endpoint middleware
//!
//! A middleware takes an endpoint and returns a new endpoint with the same
//! request and response types. Middleware observes calls; it must hand back
//! the wrapped endpoint's result untouched.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::{BoxEndpoint, Context, Endpoint, Outcome};
use crate::types::Result;

/// Decorator over an endpoint
pub trait Middleware<Req, Resp>: Send + Sync {
    fn wrap(&self, next: BoxEndpoint<Req, Resp>) -> BoxEndpoint<Req, Resp>;
}

/// Ordered middleware stack
///
/// The first middleware added is the outermost: it sees the call first and
/// the result last.
pub struct Chain<Req, Resp> {
    layers: Vec<Arc<dyn Middleware<Req, Resp>>>,
}

impl<Req, Resp> Chain<Req, Resp> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a middleware inside the ones already present
    pub fn with(mut self, middleware: impl Middleware<Req, Resp> + 'static) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wrap `endpoint` in every middleware of the chain
    pub fn apply(&self, endpoint: BoxEndpoint<Req, Resp>) -> BoxEndpoint<Req, Resp> {
        self.layers
            .iter()
            .rev()
            .fold(endpoint, |next, middleware| middleware.wrap(next))
    }
}

impl<Req, Resp> Default for Chain<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> Middleware<Req, Resp> for Chain<Req, Resp> {
    fn wrap(&self, next: BoxEndpoint<Req, Resp>) -> BoxEndpoint<Req, Resp> {
        self.apply(next)
    }
}

/// Logs one event before and one after every call
///
/// Events carry the operation name and the request id, so calls can be
/// attributed when several endpoints log concurrently.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    method: &'static str,
}

impl LoggingMiddleware {
    pub fn new(method: &'static str) -> Self {
        Self { method }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }
}

impl<Req, Resp> Middleware<Req, Resp> for LoggingMiddleware
where
    Req: Send + 'static,
    Resp: Outcome + Send + 'static,
{
    fn wrap(&self, next: BoxEndpoint<Req, Resp>) -> BoxEndpoint<Req, Resp> {
        Arc::new(Logged {
            method: self.method,
            next,
        })
    }
}

struct Logged<Req, Resp> {
    method: &'static str,
    next: BoxEndpoint<Req, Resp>,
}

#[async_trait::async_trait]
impl<Req, Resp> Endpoint<Req, Resp> for Logged<Req, Resp>
where
    Req: Send + 'static,
    Resp: Outcome + Send + 'static,
{
    async fn call(&self, ctx: &Context, request: Req) -> Result<Resp> {
        let request_id = ctx.request_id();
        info!(method = self.method, %request_id, "calling endpoint");

        let started = Instant::now();
        let result = self.next.call(ctx, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(resp) => match resp.business_error() {
                Some(err) => info!(method = self.method, %request_id, elapsed_ms, err, "called endpoint"),
                None => info!(method = self.method, %request_id, elapsed_ms, "called endpoint"),
            },
            Err(e) => warn!(method = self.method, %request_id, elapsed_ms, error = %e, "called endpoint"),
        }

        result
    }
}
