//! Problem endpoints
//!
//! One endpoint per query service operation, plus the [`Endpoints`] bundle
//! that wires each of them through its own logging middleware.

use serde::Serialize;
use std::sync::Arc;

use super::{BoxEndpoint, Context, Endpoint, LoggingMiddleware, Middleware, Outcome};
use crate::catalog::Problem;
use crate::service::{HealthState, HealthStatus, ProblemsService};
use crate::types::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemResponse {
    pub problem: Option<Problem>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub err: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProblemsRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemsResponse {
    pub problems: Vec<Problem>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub err: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthCheckRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResponse {
    pub health: HealthStatus,
}

impl Outcome for ProblemResponse {
    fn business_error(&self) -> Option<&str> {
        (!self.err.is_empty()).then_some(self.err.as_str())
    }
}

impl Outcome for ProblemsResponse {
    fn business_error(&self) -> Option<&str> {
        (!self.err.is_empty()).then_some(self.err.as_str())
    }
}

impl Outcome for HealthCheckResponse {
    fn business_error(&self) -> Option<&str> {
        match self.health.status {
            HealthState::Ok => None,
            HealthState::Fail => Some(self.health.detail.as_str()),
        }
    }
}

/// Looks up a single problem by id
pub struct ProblemEndpoint {
    svc: Arc<dyn ProblemsService>,
}

impl ProblemEndpoint {
    pub fn new(svc: Arc<dyn ProblemsService>) -> Self {
        Self { svc }
    }
}

#[async_trait::async_trait]
impl Endpoint<ProblemRequest, ProblemResponse> for ProblemEndpoint {
    async fn call(&self, ctx: &Context, request: ProblemRequest) -> Result<ProblemResponse> {
        ctx.check()?;
        Ok(match self.svc.find_by_id(ctx, &request.id).await {
            Ok(problem) => ProblemResponse {
                problem,
                err: String::new(),
            },
            Err(e) => ProblemResponse {
                problem: None,
                err: e.to_string(),
            },
        })
    }
}

/// Lists the whole catalog
pub struct ProblemsEndpoint {
    svc: Arc<dyn ProblemsService>,
}

impl ProblemsEndpoint {
    pub fn new(svc: Arc<dyn ProblemsService>) -> Self {
        Self { svc }
    }
}

#[async_trait::async_trait]
impl Endpoint<ProblemsRequest, ProblemsResponse> for ProblemsEndpoint {
    async fn call(&self, ctx: &Context, _request: ProblemsRequest) -> Result<ProblemsResponse> {
        ctx.check()?;
        Ok(match self.svc.find_all(ctx).await {
            Ok(problems) => ProblemsResponse {
                problems,
                err: String::new(),
            },
            Err(e) => ProblemsResponse {
                problems: Vec::new(),
                err: e.to_string(),
            },
        })
    }
}

/// Reports catalog health
pub struct HealthCheckEndpoint {
    svc: Arc<dyn ProblemsService>,
}

impl HealthCheckEndpoint {
    pub fn new(svc: Arc<dyn ProblemsService>) -> Self {
        Self { svc }
    }
}

#[async_trait::async_trait]
impl Endpoint<HealthCheckRequest, HealthCheckResponse> for HealthCheckEndpoint {
    async fn call(
        &self,
        ctx: &Context,
        _request: HealthCheckRequest,
    ) -> Result<HealthCheckResponse> {
        ctx.check()?;
        let health = self
            .svc
            .health_check(ctx)
            .await
            .unwrap_or_else(|e| HealthStatus::fail(e.to_string()));
        Ok(HealthCheckResponse { health })
    }
}

/// The three endpoints served by this process
#[derive(Clone)]
pub struct Endpoints {
    pub problem: BoxEndpoint<ProblemRequest, ProblemResponse>,
    pub problems: BoxEndpoint<ProblemsRequest, ProblemsResponse>,
    pub health_check: BoxEndpoint<HealthCheckRequest, HealthCheckResponse>,
}

impl Endpoints {
    /// Build the endpoints, each behind its own logging middleware tagged
    /// with the operation name
    pub fn new(svc: Arc<dyn ProblemsService>) -> Self {
        let bare = Self::unwrapped(svc);
        Self {
            problem: LoggingMiddleware::new("FindById").wrap(bare.problem),
            problems: LoggingMiddleware::new("FindAll").wrap(bare.problems),
            health_check: LoggingMiddleware::new("HealthCheck").wrap(bare.health_check),
        }
    }

    /// Build the endpoints without any middleware
    pub fn unwrapped(svc: Arc<dyn ProblemsService>) -> Self {
        Self {
            problem: Arc::new(ProblemEndpoint::new(Arc::clone(&svc))),
            problems: Arc::new(ProblemsEndpoint::new(Arc::clone(&svc))),
            health_check: Arc::new(HealthCheckEndpoint::new(svc)),
        }
    }
}

/// Calling the service through its endpoints turns business errors carried
/// in responses back into `Err` values.
#[async_trait::async_trait]
impl ProblemsService for Endpoints {
    async fn find_all(&self, ctx: &Context) -> Result<Vec<Problem>> {
        let resp = self.problems.call(ctx, ProblemsRequest).await?;
        match resp.business_error() {
            Some(err) => Err(StoreError::Internal(err.to_string())),
            None => Ok(resp.problems),
        }
    }

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<Problem>> {
        let request = ProblemRequest { id: id.to_string() };
        let resp = self.problem.call(ctx, request).await?;
        match resp.business_error() {
            Some(err) => Err(StoreError::Internal(err.to_string())),
            None => Ok(resp.problem),
        }
    }

    async fn health_check(&self, ctx: &Context) -> Result<HealthStatus> {
        let resp = self.health_check.call(ctx, HealthCheckRequest).await?;
        Ok(resp.health)
    }
}
