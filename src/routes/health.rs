//! Health check endpoint
//!
//! Reports process health rather than catalog contents, so unlike the
//! problem routes an unhealthy catalog maps to a 503.
//!
//! - `/api/v1/health`, `/health`, `/healthz`
//!
//! ```text
//! curl -i http://localhost:8080/api/v1/health
//! ```

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::endpoint::{Context, Endpoint, HealthCheckRequest};
use crate::server::AppState;
use crate::service::{HealthState, HealthStatus};
use crate::transport::{error_response, json_response};

/// Health response body
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HealthResponse {
    Ok {
        status: HealthState,
        #[serde(rename = "problemsCount")]
        problems_count: usize,
    },
    Fail {
        status: HealthState,
        reason: String,
    },
}

impl From<HealthStatus> for HealthResponse {
    fn from(health: HealthStatus) -> Self {
        match health.status {
            HealthState::Ok => Self::Ok {
                status: HealthState::Ok,
                problems_count: health.problems_count,
            },
            HealthState::Fail => Self::Fail {
                status: HealthState::Fail,
                reason: health.detail,
            },
        }
    }
}

/// Run the health check endpoint and map its outcome to a status code
pub async fn health_check(state: &AppState, ctx: &Context) -> Response<Full<Bytes>> {
    match state.endpoints.health_check.call(ctx, HealthCheckRequest).await {
        Ok(resp) => {
            let status = if resp.health.is_ok() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            json_response(status, &HealthResponse::from(resp.health))
        }
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::HEALTH_FAIL_REASON;

    #[test]
    fn test_ok_body() {
        let body = serde_json::to_value(HealthResponse::from(HealthStatus::ok(2))).unwrap();
        assert_eq!(body, serde_json::json!({"status": "ok", "problemsCount": 2}));
    }

    #[test]
    fn test_fail_body() {
        let body =
            serde_json::to_value(HealthResponse::from(HealthStatus::fail(HEALTH_FAIL_REASON)))
                .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "fail", "reason": "problems setup failed"})
        );
    }
}
