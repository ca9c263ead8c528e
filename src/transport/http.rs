//! HTTP transport adapter
//!
//! Each route is a decode / invoke / encode triple around one endpoint.
//! Decoding turns router-extracted path parameters into a typed request and
//! fails with `BadRouting` before any endpoint or middleware runs. Encoding
//! writes the response payload as JSON; business errors are still written as
//! data with a 200 status.
//!
//! ```text
//! curl -i http://localhost:8080/api/v1/problems
//! curl -i http://localhost:8080/api/v1/problems/fib
//! ```

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::endpoint::{
    BoxEndpoint, Context, Endpoint, Endpoints, ProblemRequest, ProblemResponse, ProblemsRequest,
    ProblemsResponse,
};
use crate::types::{Result, StoreError};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Path parameter carrying the problem id
pub const PROBLEM_ID_PARAM: &str = "problemId";

/// Parameters extracted from the request path by the router
pub type PathParams = HashMap<String, String>;

pub type DecodeRequestFn<Req> = fn(&PathParams) -> Result<Req>;
pub type EncodeResponseFn<Resp> = fn(Resp) -> Result<Response<Full<Bytes>>>;

/// One endpoint bound to HTTP
pub struct HttpHandler<Req, Resp> {
    endpoint: BoxEndpoint<Req, Resp>,
    decode: DecodeRequestFn<Req>,
    encode: EncodeResponseFn<Resp>,
}

impl<Req, Resp> HttpHandler<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    pub fn new(
        endpoint: BoxEndpoint<Req, Resp>,
        decode: DecodeRequestFn<Req>,
        encode: EncodeResponseFn<Resp>,
    ) -> Self {
        Self {
            endpoint,
            decode,
            encode,
        }
    }

    /// Decode, invoke the endpoint, encode
    pub async fn serve(&self, ctx: &Context, params: &PathParams) -> Response<Full<Bytes>> {
        let request = match (self.decode)(params) {
            Ok(request) => request,
            Err(e) => {
                warn!(request_id = %ctx.request_id(), error = %e, "Failed to decode request");
                return error_response(e);
            }
        };

        let response = match self.endpoint.call(ctx, request).await {
            Ok(response) => response,
            Err(e) => return error_response(e),
        };

        (self.encode)(response).unwrap_or_else(error_response)
    }
}

/// HTTP handlers for the problem routes
pub struct HttpTransport {
    /// `GET /api/v1/problems/{problemId}`
    pub problem: HttpHandler<ProblemRequest, ProblemResponse>,
    /// `GET /api/v1/problems`
    pub problems: HttpHandler<ProblemsRequest, ProblemsResponse>,
}

impl HttpTransport {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            problem: HttpHandler::new(
                endpoints.problem.clone(),
                decode_problem_request,
                encode_problem_response,
            ),
            problems: HttpHandler::new(
                endpoints.problems.clone(),
                decode_problems_request,
                encode_problems_response,
            ),
        }
    }
}

pub fn decode_problem_request(params: &PathParams) -> Result<ProblemRequest> {
    match params.get(PROBLEM_ID_PARAM) {
        Some(id) => Ok(ProblemRequest { id: id.clone() }),
        None => Err(StoreError::BadRouting(format!(
            "missing path parameter {}",
            PROBLEM_ID_PARAM
        ))),
    }
}

pub fn decode_problems_request(_params: &PathParams) -> Result<ProblemsRequest> {
    Ok(ProblemsRequest)
}

/// Writes the problem, or `{}` when nothing matched
pub fn encode_problem_response(resp: ProblemResponse) -> Result<Response<Full<Bytes>>> {
    let body = match &resp.problem {
        Some(problem) => to_json(problem)?,
        None => b"{}".to_vec(),
    };
    Ok(with_json_body(StatusCode::OK, body))
}

pub fn encode_problems_response(resp: ProblemsResponse) -> Result<Response<Full<Bytes>>> {
    let body = to_json(&resp.problems)?;
    Ok(with_json_body(StatusCode::OK, body))
}

/// Build a JSON response with the given status code
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let body = to_json(body).unwrap_or_else(|_| b"{}".to_vec());
    with_json_body(status, body)
}

/// Convert a transport-level error to an HTTP response
pub fn error_response(error: StoreError) -> Response<Full<Bytes>> {
    let (status, message) = error.into_status_code_and_body();
    json_response(status, &serde_json::json!({ "error": message }))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StoreError::Internal(format!("encode failed: {}", e)))
}

fn with_json_body(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Problem};
    use crate::service::CatalogService;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn transport() -> HttpTransport {
        let catalog = Catalog::new(vec![
            Problem::new("fib").with_field("title", "Fibonacci"),
            Problem::new("sort").with_field("title", "Sort"),
        ]);
        let endpoints = Endpoints::new(Arc::new(CatalogService::new(Arc::new(catalog))));
        HttpTransport::new(&endpoints)
    }

    fn params(id: &str) -> PathParams {
        PathParams::from([(PROBLEM_ID_PARAM.to_string(), id.to_string())])
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Counts calls that reach it
    struct Counting(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl Endpoint<ProblemRequest, ProblemResponse> for Counting {
        async fn call(&self, _ctx: &Context, _request: ProblemRequest) -> Result<ProblemResponse> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ProblemResponse {
                problem: None,
                err: String::new(),
            })
        }
    }

    #[test]
    fn test_decode_problem_request() {
        assert_eq!(
            decode_problem_request(&params("fib")).unwrap(),
            ProblemRequest { id: "fib".into() }
        );
        assert!(matches!(
            decode_problem_request(&PathParams::new()),
            Err(StoreError::BadRouting(_))
        ));
    }

    #[tokio::test]
    async fn test_serve_problem() {
        let response = transport().problem.serve(&Context::new(), &params("fib")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"Id": "fib", "title": "Fibonacci"})
        );
    }

    #[tokio::test]
    async fn test_serve_missing_problem_is_empty_object() {
        let response = transport()
            .problem
            .serve(&Context::new(), &params("missing"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_serve_problems() {
        let response = transport()
            .problems
            .serve(&Context::new(), &PathParams::new())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["Id"], "fib");
        assert_eq!(body[1]["Id"], "sort");
    }

    #[tokio::test]
    async fn test_uninitialized_catalog_is_empty_array() {
        let endpoints = Endpoints::new(Arc::new(CatalogService::uninitialized()));
        let response = HttpTransport::new(&endpoints)
            .problems
            .serve(&Context::new(), &PathParams::new())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_bad_routing_never_reaches_endpoint() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting: BoxEndpoint<ProblemRequest, ProblemResponse> =
            Arc::new(Counting(Arc::clone(&calls)));
        let handler = HttpHandler::new(
            counting,
            decode_problem_request,
            encode_problem_response,
        );

        let response = handler.serve(&Context::new(), &PathParams::new()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = handler.serve(&Context::new(), &params("fib")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_request_maps_to_status() {
        let ctx = Context::new();
        ctx.cancel();
        let response = transport().problem.serve(&ctx, &params("fib")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "Request cancelled");
    }
}
