//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling, one task per accepted
//! connection. The catalog is loaded before [`AppState`] exists, so every
//! connection task sees the fully populated catalog through the shared `Arc`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::Args;
use crate::endpoint::{Context, Endpoints};
use crate::routes;
use crate::service::CatalogService;
use crate::transport::{json_response, HttpTransport, PathParams, PROBLEM_ID_PARAM};
use crate::types::StoreError;

const PROBLEMS_PATH: &str = "/api/v1/problems";
const PROBLEM_PREFIX: &str = "/api/v1/problems/";

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Logged endpoints over the catalog
    pub endpoints: Endpoints,
    /// HTTP bindings of the problem endpoints
    pub transport: HttpTransport,
}

impl AppState {
    /// Publish a loaded catalog behind the endpoint and transport layers
    pub fn new(args: Args, catalog: Catalog) -> Self {
        let service = Arc::new(CatalogService::new(Arc::new(catalog)));
        let endpoints = Endpoints::new(service);
        let transport = HttpTransport::new(&endpoints);
        Self {
            args,
            endpoints,
            transport,
        }
    }

    /// State built around existing endpoints
    pub fn with_endpoints(args: Args, endpoints: Endpoints) -> Self {
        let transport = HttpTransport::new(&endpoints);
        Self {
            args,
            endpoints,
            transport,
        }
    }
}

/// Bind the configured address and serve until ctrl-c
pub async fn run(state: Arc<AppState>) -> Result<(), StoreError> {
    let listener = TcpListener::bind(state.args.listen).await.map_err(|e| {
        StoreError::Config(format!("failed to bind {}: {}", state.args.listen, e))
    })?;

    info!(
        "Problems store listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    tokio::select! {
        _ = serve(listener, state) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Accept connections on `listener` forever
pub async fn serve(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Log and route one incoming request
///
/// Request bodies are never read, so any body type is accepted.
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let ctx = Context::with_timeout(state.args.request_timeout());
    info!(request_id = %ctx.request_id(), "[{}] {} {}", addr, method, path);

    Ok(route(&state, &ctx, &method, &path).await)
}

/// Match method and path to a handler
pub async fn route(
    state: &AppState,
    ctx: &Context,
    method: &Method,
    path: &str,
) -> Response<Full<Bytes>> {
    match (method, path) {
        (&Method::GET, "/api/v1/health") | (&Method::GET, "/health") | (&Method::GET, "/healthz") => {
            routes::health_check(state, ctx).await
        }

        (&Method::GET, PROBLEMS_PATH) => {
            state.transport.problems.serve(ctx, &PathParams::new()).await
        }

        (&Method::GET, p) if p.starts_with(PROBLEM_PREFIX) => match problem_params(p) {
            Some(params) => state.transport.problem.serve(ctx, &params).await,
            None => not_found_response(p),
        },

        (_, p) if is_known_path(p) => method_not_allowed_response(),

        (_, p) => not_found_response(p),
    }
}

/// Extract `problemId` from `/api/v1/problems/{problemId}`
///
/// The segment is percent-decoded. An empty segment, or one that does not
/// decode to UTF-8, yields no parameter, which the decoder reports as bad
/// routing. Nested segments do not match the route at all.
fn problem_params(path: &str) -> Option<PathParams> {
    let segment = path.strip_prefix(PROBLEM_PREFIX)?;
    if segment.contains('/') {
        return None;
    }

    let mut params = PathParams::new();
    if let Ok(id) = urlencoding::decode(segment) {
        if !id.is_empty() {
            params.insert(PROBLEM_ID_PARAM.to_string(), id.into_owned());
        }
    }
    Some(params)
}

fn is_known_path(path: &str) -> bool {
    matches!(path, "/api/v1/health" | "/health" | "/healthz" | PROBLEMS_PATH)
        || path.starts_with(PROBLEM_PREFIX)
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({
            "error": "Not Found",
            "path": path,
        }),
    )
}

/// Method not allowed response
fn method_not_allowed_response() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({ "error": "Method not allowed" }),
    )
}
