//! End-to-end tests against a live listener

use clap::Parser;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use problems_store::catalog::Catalog;
use problems_store::config::Args;
use problems_store::server::{self, AppState};

const SCENARIO: &str = r#"[
    {"Id": "fib", "title": "Fibonacci"},
    {"Id": "sort", "title": "Sort"}
]"#;

async fn start(catalog: Catalog) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let args = Args::parse_from(["problems-store", "--listen", &addr.to_string()]);
    let state = Arc::new(AppState::new(args, catalog));
    tokio::spawn(server::serve(listener, state));
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, Value) {
    let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.json::<Value>().await.unwrap();
    (status, content_type, body)
}

#[tokio::test]
async fn test_scenario_over_the_wire() {
    let addr = start(Catalog::from_slice(SCENARIO.as_bytes()).unwrap()).await;

    let (status, content_type, body) = get(addr, "/api/v1/problems").await;
    assert_eq!(status, 200);
    assert_eq!(content_type, "application/json; charset=utf-8");
    assert_eq!(
        body,
        json!([{"Id": "fib", "title": "Fibonacci"}, {"Id": "sort", "title": "Sort"}])
    );

    let (status, _, body) = get(addr, "/api/v1/problems/fib").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"Id": "fib", "title": "Fibonacci"}));

    let (status, _, body) = get(addr, "/api/v1/problems/missing").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({}));

    let (status, _, body) = get(addr, "/api/v1/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok", "problemsCount": 2}));

    let (status, _, _) = get(addr, "/api/v1/problems/").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_empty_catalog_over_the_wire() {
    let addr = start(Catalog::from_slice(b"[]").unwrap()).await;

    let (status, _, body) = get(addr, "/api/v1/problems").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    let (status, _, body) = get(addr, "/api/v1/health").await;
    assert_eq!(status, 503);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_concurrent_lookups() {
    let addr = start(Catalog::from_slice(SCENARIO.as_bytes()).unwrap()).await;

    let lookups = (0..16).map(|i| {
        let id = if i % 2 == 0 { "fib" } else { "sort" };
        tokio::spawn(async move { (id, get(addr, &format!("/api/v1/problems/{}", id)).await) })
    });

    for lookup in lookups.collect::<Vec<_>>() {
        let (id, (status, _, body)) = lookup.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body["Id"], id);
    }
}
