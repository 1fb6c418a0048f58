use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use phonelock_sdk::{ClientConfig, ClientError, ErrorKind, SessionApi, SessionClient, SessionStatus};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

fn client_for(addr: SocketAddr, timeout: Duration) -> SessionClient {
    SessionClient::new(ClientConfig::new(format!("http://{addr}/")).with_timeout(timeout))
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn reads_locked_status() {
    let router = Router::new().route(
        "/session/status",
        get(|| async { Json(json!({"locked": true, "remainingSeconds": 42})) }),
    );
    let addr = serve(router).await;

    let status = client_for(addr, Duration::from_secs(3))
        .get_session_status()
        .await
        .expect("status");
    assert_eq!(
        status,
        SessionStatus {
            locked: true,
            remaining_seconds: 42
        }
    );
}

#[tokio::test]
async fn start_posts_minutes_as_json() {
    let seen: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::new(Mutex::new(Vec::new()));
    let router = {
        let seen = seen.clone();
        Router::new().route(
            "/session/start",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push((content_type(&headers), body));
                    StatusCode::NO_CONTENT
                }
            }),
        )
    };
    let addr = serve(router).await;

    client_for(addr, Duration::from_secs(3))
        .start_session(25)
        .await
        .expect("start");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("application/json"));
    assert_eq!(seen[0].1, json!({"minutes": 25}));
}

#[tokio::test]
async fn every_request_declares_json() {
    let seen: Arc<Mutex<Vec<(&'static str, Option<String>)>>> = Arc::new(Mutex::new(Vec::new()));
    let router = {
        let on_status = seen.clone();
        let on_stop = seen.clone();
        Router::new()
            .route(
                "/session/status",
                get(move |headers: HeaderMap| {
                    let seen = on_status.clone();
                    async move {
                        seen.lock().unwrap().push(("status", content_type(&headers)));
                        Json(json!({"locked": false, "remainingSeconds": 0}))
                    }
                }),
            )
            .route(
                "/session/stop",
                post(move |headers: HeaderMap| {
                    let seen = on_stop.clone();
                    async move {
                        seen.lock().unwrap().push(("stop", content_type(&headers)));
                        StatusCode::NO_CONTENT
                    }
                }),
            )
    };
    let addr = serve(router).await;
    let client = client_for(addr, Duration::from_secs(3));

    client.get_session_status().await.expect("status");
    client.stop_session().await.expect("stop");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("status", Some("application/json".to_string())),
            ("stop", Some("application/json".to_string())),
        ]
    );
}

#[tokio::test]
async fn stop_tolerates_empty_and_non_json_bodies() {
    let router = Router::new()
        .route("/session/stop", post(|| async { "OK" }))
        .route("/session/start", post(|| async { StatusCode::OK }));
    let addr = serve(router).await;
    let client = client_for(addr, Duration::from_secs(3));

    client.stop_session().await.expect("stop with text body");
    client.start_session(1).await.expect("start with empty body");
}

#[tokio::test]
async fn empty_status_body_is_treated_as_unlocked() {
    let router = Router::new().route("/session/status", get(|| async { StatusCode::OK }));
    let addr = serve(router).await;

    let status = client_for(addr, Duration::from_secs(3))
        .get_session_status()
        .await
        .expect("empty status");
    assert_eq!(status, SessionStatus::default());
}

#[tokio::test]
async fn malformed_status_body_is_a_parse_error() {
    let router = Router::new().route("/session/status", get(|| async { "not json" }));
    let addr = serve(router).await;

    let err = client_for(addr, Duration::from_secs(3))
        .get_session_status()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn server_error_carries_code_and_reason() {
    let router = Router::new().route(
        "/session/start",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(router).await;

    let err = client_for(addr, Duration::from_secs(3))
        .start_session(25)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::HttpStatus {
            code: 500,
            reason: "Internal Server Error".into()
        }
    );
    assert!(err.to_string().starts_with("Server returned 500"));
}

#[tokio::test]
async fn response_inside_budget_succeeds() {
    let router = Router::new().route(
        "/session/status",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Json(json!({"locked": false, "remainingSeconds": 0}))
        }),
    );
    let addr = serve(router).await;

    let status = client_for(addr, Duration::from_millis(300))
        .get_session_status()
        .await
        .expect("slow but in budget");
    assert!(!status.locked);
}

#[tokio::test]
async fn silent_server_times_out() {
    let router = Router::new().route(
        "/session/status",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({"locked": true, "remainingSeconds": 1}))
        }),
    );
    let addr = serve(router).await;

    let started = tokio::time::Instant::now();
    let err = client_for(addr, Duration::from_millis(200))
        .get_session_status()
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client_for(addr, Duration::from_secs(3))
        .stop_session()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().starts_with("Network error — "));
}
