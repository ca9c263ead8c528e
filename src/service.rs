//! Problem query service
//!
//! Three read operations over the catalog. The trait is the seam the endpoint
//! layer builds on; `CatalogService` is the in-memory implementation and the
//! endpoints bundle implements it again as a client over the endpoints.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Catalog, Problem};
use crate::endpoint::Context;
use crate::types::{Result, StoreError};

/// Reason reported when the catalog is empty or was never published
pub const HEALTH_FAIL_REASON: &str = "problems setup failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Fail,
}

/// Outcome of a health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    /// Number of problems currently served
    pub problems_count: usize,
    /// Record count when healthy, failure reason otherwise
    pub detail: String,
}

impl HealthStatus {
    pub fn ok(problems_count: usize) -> Self {
        Self {
            status: HealthState::Ok,
            problems_count,
            detail: problems_count.to_string(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            status: HealthState::Fail,
            problems_count: 0,
            detail: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthState::Ok
    }
}

/// Read operations over the problem catalog
#[async_trait::async_trait]
pub trait ProblemsService: Send + Sync {
    /// Every problem in load order
    async fn find_all(&self, ctx: &Context) -> Result<Vec<Problem>>;

    /// First problem with the given id, `None` when nothing matches
    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<Problem>>;

    /// Report whether the catalog is populated
    async fn health_check(&self, ctx: &Context) -> Result<HealthStatus>;
}

/// Query service backed by the in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogService {
    catalog: Option<Arc<Catalog>>,
}

impl CatalogService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    /// A service whose catalog was never published
    pub fn uninitialized() -> Self {
        Self { catalog: None }
    }

    fn catalog(&self) -> Result<&Catalog> {
        self.catalog.as_deref().ok_or(StoreError::CatalogUnavailable)
    }
}

#[async_trait::async_trait]
impl ProblemsService for CatalogService {
    async fn find_all(&self, _ctx: &Context) -> Result<Vec<Problem>> {
        Ok(self.catalog()?.problems().to_vec())
    }

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<Problem>> {
        let found = self.catalog()?.find(id).cloned();
        if found.is_none() {
            debug!(request_id = %ctx.request_id(), problem_id = %id, "Problem not found");
        }
        Ok(found)
    }

    async fn health_check(&self, _ctx: &Context) -> Result<HealthStatus> {
        Ok(match self.catalog.as_deref() {
            Some(catalog) if !catalog.is_empty() => HealthStatus::ok(catalog.len()),
            _ => HealthStatus::fail(HEALTH_FAIL_REASON),
        })
    }
}
