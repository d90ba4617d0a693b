//! HTTP resolution service, in-process and over a real socket.

mod common;

use axum::http::StatusCode;
use route_dispatch::config::ServerConfig;
use route_dispatch::http::{RouteResponse, X_REQUEST_ID};
use route_dispatch::routing::Capture;
use route_dispatch::testing::TestClient;
use route_dispatch::{HttpServer, RouteValue, Shutdown};
use tokio::net::TcpListener;

use common::sample_site;

fn client() -> TestClient {
    let server = HttpServer::new(sample_site(), &ServerConfig::default());
    TestClient::new(server.router())
}

#[tokio::test]
async fn test_matched_route_is_json() {
    let res = client().get("/users/42?tab=posts").send().await;
    res.assert_status(StatusCode::OK);

    let body: RouteResponse = res.json();
    assert_eq!(body.route.qualified_name(), "users.show");
    assert_eq!(body.route.inner().unwrap().captures(), &[Capture::Int(42)]);
    assert_eq!(body.path.as_deref(), Some("/users/42"));
}

#[tokio::test]
async fn test_method_not_allowed() {
    client()
        .post("/users/42")
        .send()
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED)
        .assert_body_contains("Method not allowed");
}

#[tokio::test]
async fn test_not_found() {
    let client = client();
    client
        .get("/users/abc")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_body_contains("No matching route");
    // Mounted sub-sites report their own method mismatch as a miss.
    client.delete("/api/1/status").send().await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subsite_over_http() {
    let res = client().get("/api/2/items").send().await;
    res.assert_status(StatusCode::OK);

    let body: RouteResponse = res.json();
    assert_eq!(body.route.qualified_name(), "api.items.list");
    assert_eq!(body.route.captures(), &[Capture::UInt(2)]);
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let client = client();

    let res = client.get("/").send().await;
    res.assert_status(StatusCode::OK);
    let generated = res.header(X_REQUEST_ID).expect("request id header");
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    client
        .get("/")
        .header(X_REQUEST_ID, "req-123")
        .send()
        .await
        .assert_header(X_REQUEST_ID, "req-123");
}

#[tokio::test]
async fn test_serve_and_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(sample_site(), &ServerConfig::default());
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let http = reqwest::Client::new();
    let res = http
        .put(format!("http://{}/users/7", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: RouteResponse = res.json().await.unwrap();
    assert_eq!(
        body.route,
        RouteValue::Nested {
            name: "users".into(),
            captures: vec![],
            child: Box::new(RouteValue::resource("show", vec![Capture::Int(7)])),
        }
    );

    let res = http
        .get(format!("http://{}/nowhere", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    drop(http);
    assert_eq!(shutdown.trigger(), 1);
    handle.await.unwrap().unwrap();
}
