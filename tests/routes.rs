//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! Each test builds its own router, so every test starts from a fresh request counter.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use podprobe::http::ShutdownSignal;
use podprobe::{create_router, AppConfig, AppState};

const BODY_LIMIT: usize = 64 * 1024;

fn router_with(config: AppConfig, env: HashMap<String, String>) -> (Router, AppState) {
    let state = AppState::new(config, Arc::new(env), ShutdownSignal::new());
    (create_router(state.clone()), state)
}

fn config_for(podinfo_dir: &Path) -> AppConfig {
    AppConfig {
        podinfo_dir: podinfo_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "pod.test:8000")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn request_count(body: &str) -> u64 {
    body.split_whitespace().next().unwrap().parse().unwrap()
}

#[tokio::test]
async fn sequential_requests_count_from_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = router_with(config_for(tmp.path()), HashMap::new());

    for expected in 0..5 {
        let (status, body) = send(&app, Method::GET, "/anything").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(request_count(&body), expected);
    }
}

#[tokio::test]
async fn concurrent_requests_get_unique_counts() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = router_with(config_for(tmp.path()), HashMap::new());

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let (status, body) = send(&app, Method::GET, &format!("/req/{i}")).await;
                assert_eq!(status, StatusCode::OK);
                request_count(&body)
            })
        })
        .collect();

    let mut counts = Vec::new();
    for task in tasks {
        counts.push(task.await.unwrap());
    }
    counts.sort_unstable();

    assert_eq!(counts, (0..50).collect::<Vec<_>>());
    assert_eq!(state.counter.current(), 50);
}

#[tokio::test]
async fn report_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let mut env = HashMap::new();
    env.insert("MY_NODE_NAME".to_string(), "node-a".to_string());
    env.insert("MY_POD_IP".to_string(), "10.0.0.7".to_string());
    let (app, _) = router_with(config_for(tmp.path()), env);

    let (status, body) = send(&app, Method::POST, "/some/path?x=1").await;
    assert_eq!(status, StatusCode::OK);

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "0 POST /some/path");
    assert_eq!(lines[1], "path: /some/path");
    assert_eq!(lines[2], "Host: pod.test:8000");
    assert_eq!(lines[3], "ENV MY_NODE_NAME = node-a");
    assert_eq!(lines[4], "ENV MY_POD_NAME = none");
    assert_eq!(lines[5], "ENV MY_POD_IP = 10.0.0.7");
    assert_eq!(lines[10], "ENV MY_POD_MEM_REQUEST_MB = none");
    assert_eq!(lines.len(), 11);
}

#[tokio::test]
async fn report_is_plain_text_and_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = router_with(config_for(tmp.path()), HashMap::new());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let body = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Host: \n"));
}

#[tokio::test]
async fn path_outside_context_is_404_and_not_counted() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        app_context: "/myapp".to_string(),
        ..config_for(tmp.path())
    };
    let (app, state) = router_with(config, HashMap::new());

    let (status, body) = send(&app, Method::GET, "/other").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "404 only configured to deliver from /myapp");
    assert_eq!(state.counter.current(), 0);

    let (status, body) = send(&app, Method::GET, "/myapp/page").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request_count(&body), 0);
}

#[tokio::test]
async fn missing_podinfo_still_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = router_with(config_for(&tmp.path().join("podinfo")), HashMap::new());

    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().filter(|l| l.starts_with("ENV ")).count(), 8);
    assert!(!body.lines().any(|l| l.starts_with("FILE ")));
}

#[tokio::test]
async fn unlistable_podinfo_still_reports() {
    let not_a_dir = tempfile::NamedTempFile::new().unwrap();
    let (app, state) = router_with(config_for(not_a_dir.path()), HashMap::new());

    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().filter(|l| l.starts_with("ENV ")).count(), 8);
    assert!(!body.lines().any(|l| l.starts_with("FILE ")));

    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request_count(&body), 1);
    assert_eq!(state.counter.current(), 2);
}

#[tokio::test]
async fn podinfo_files_are_reported() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("labels"), "app=demo").unwrap();
    std::fs::write(tmp.path().join("annotations"), "author=\"ops\"\nteam=\"core\"\n").unwrap();
    std::fs::create_dir(tmp.path().join("nested")).unwrap();
    let (app, _) = router_with(config_for(tmp.path()), HashMap::new());

    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);

    let labels = format!("FILE {} = ['app=demo']", tmp.path().join("labels").display());
    let annotations = format!(
        "FILE {} = ['author=\"ops\"\\n', 'team=\"core\"\\n']",
        tmp.path().join("annotations").display()
    );
    assert!(body.lines().any(|l| l == labels), "body: {body}");
    assert!(body.lines().any(|l| l == annotations), "body: {body}");
    assert_eq!(body.lines().filter(|l| l.starts_with("FILE ")).count(), 2);
}

#[tokio::test]
async fn podinfo_is_reread_per_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = router_with(config_for(tmp.path()), HashMap::new());

    let (_, body) = send(&app, Method::GET, "/").await;
    assert!(!body.contains("FILE "));

    std::fs::write(tmp.path().join("name"), "web-0").unwrap();
    let (_, body) = send(&app, Method::GET, "/").await;
    assert!(body.contains("= ['web-0']"));
}

#[tokio::test]
async fn healthz_returns_compact_json() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        version: "1.2.3".to_string(),
        build_time: "2024-01-01".to_string(),
        ..config_for(tmp.path())
    };
    let (app, state) = router_with(config, HashMap::new());

    for method in [Method::GET, Method::POST] {
        let (status, body) = send(&app, method, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"BuildTime":"2024-01-01","Version":"1.2.3","health":"ok"}"#
        );
    }
    assert_eq!(state.counter.current(), 0);
}

#[tokio::test]
async fn healthz_ignores_app_context() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        app_context: "/myapp".to_string(),
        ..config_for(tmp.path())
    };
    let (app, _) = router_with(config, HashMap::new());

    let (status, body) = send(&app, Method::GET, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["health"], "ok");
    assert_eq!(json["Version"], "none");
}

#[tokio::test]
async fn shutdown_route_triggers_signal() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = router_with(config_for(tmp.path()), HashMap::new());

    let (status, _) = send(&app, Method::POST, "/shutdown").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(!state.shutdown.is_requested());

    let (status, body) = send(&app, Method::GET, "/shutdown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Server shutting down...");
    assert!(state.shutdown.is_requested());
    assert_eq!(state.counter.current(), 0);
}
