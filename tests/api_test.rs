//! End-to-end API tests over the in-memory store
//!
//! Requests go through `server::dispatch`, so routing, JSON handling and
//! CORS are exercised exactly as the listener would.

use bytes::Bytes;
use clap::Parser;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use lattice::content::SeedContent;
use lattice::server::{dispatch, AppState};
use lattice::services::seed_catalog;
use lattice::store::{InMemoryStore, Store};
use lattice::Args;

struct TestApp {
    state: Arc<AppState>,
    store: Arc<InMemoryStore>,
}

impl TestApp {
    async fn new(extra_args: &[&str]) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let content = SeedContent::builtin().expect("builtin content");
        seed_catalog(store.as_ref(), &content).await.expect("seed");

        let mut argv = vec!["lattice"];
        argv.extend_from_slice(extra_args);
        let args = Args::try_parse_from(argv).expect("args");

        let state = Arc::new(AppState::new(args, store.clone(), content));
        Self { state, store }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, body) = self.send_raw(method, uri, body, None).await;
        (status, body)
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        origin: Option<&str>,
    ) -> (StatusCode, hyper::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(origin) = origin {
            builder = builder.header("Origin", origin);
        }
        let bytes = body.map(|b| b.to_string()).unwrap_or_default();
        let request = builder.body(Full::new(Bytes::from(bytes))).unwrap();

        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let response = dispatch(Arc::clone(&self.state), peer, request)
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let raw = response.into_body().collect().await.unwrap().to_bytes();
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw).unwrap()
        };
        (status, headers, value)
    }

    async fn model_ids(&self) -> Vec<String> {
        let (_, body) = self.send(Method::GET, "/api/models", None).await;
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap().to_string())
            .collect()
    }
}

#[tokio::test]
async fn test_root_and_static_content() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app.send(Method::GET, "/api/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "AI-Powered Mind API"}));

    let (status, body) = app.send(Method::GET, "/api/introduction", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paragraphs"].is_array());

    let (status, body) = app.send(Method::GET, "/api/conclusion", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["final_thought"].is_string());
}

#[tokio::test]
async fn test_section_filter_and_search() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app
        .send(Method::GET, "/api/models?section=learning-deeper", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let models = body.as_array().unwrap();
    assert!(!models.is_empty());
    assert!(models.iter().all(|m| m["section_slug"] == "learning-deeper"));

    let (_, body) = app.send(Method::GET, "/api/models?search=PrInCiPlE", None).await;
    let models = body.as_array().unwrap();
    assert!(!models.is_empty());
    for model in models {
        let haystack = format!(
            "{} {} {}",
            model["title"].as_str().unwrap(),
            model["explanation"].as_str().unwrap(),
            model["example"].as_str().unwrap()
        )
        .to_lowercase();
        assert!(haystack.contains("principle"));
    }

    let (status, _) = app.send(Method::GET, "/api/models?limit=501", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_model_lookup_and_related() {
    let app = TestApp::new(&[]).await;

    let (status, model) = app
        .send(Method::GET, "/api/models/thinking-smarter/2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(model["title"], "Inversion");

    let (status, related) = app
        .send(Method::GET, "/api/models/thinking-smarter/2/related", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let related = related.as_array().unwrap();
    assert!(related.len() <= 5);
    assert!(related.iter().all(|m| m["id"] != model["id"]));

    let (status, body) = app
        .send(Method::GET, "/api/models/thinking-smarter/77", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Model not found");
}

#[tokio::test]
async fn test_daily_is_stable() {
    let app = TestApp::new(&[]).await;
    let (_, first) = app.send(Method::GET, "/api/daily", None).await;
    let (_, second) = app.send(Method::GET, "/api/daily", None).await;
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_daily_on_empty_catalog() {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let args = Args::try_parse_from(["lattice"]).unwrap();
    let state = Arc::new(AppState::new(args, store, SeedContent::builtin().unwrap()));

    let request = Request::builder()
        .uri("/api/daily")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = dispatch(state, "127.0.0.1:1".parse().unwrap(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_journal_lifecycle() {
    let app = TestApp::new(&[]).await;

    let (status, entry) = app
        .send(
            Method::POST,
            "/api/journal",
            Some(json!({"content": "Margin of safety saved the launch", "model_title": "Margin of Safety"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = entry["id"].as_str().unwrap().to_string();

    let (_, list) = app.send(Method::GET, "/api/journal", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/journal/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    let (_, list) = app.send(Method::GET, "/api/journal", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/journal/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::POST, "/api/journal", Some(json!({"content": "   "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_challenge_lifecycle() {
    let app = TestApp::new(&[]).await;
    let ids = app.model_ids().await;

    let (status, _) = app
        .send(Method::POST, "/api/challenge", Some(json!({"model_ids": &ids[0..3]})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut with_unknown = ids[0..5].to_vec();
    with_unknown[2] = "missing".into();
    let (status, _) = app
        .send(Method::POST, "/api/challenge", Some(json!({"model_ids": with_unknown})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, a) = app
        .send(Method::POST, "/api/challenge", Some(json!({"model_ids": &ids[0..5]})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, b) = app
        .send(Method::POST, "/api/challenge", Some(json!({"model_ids": &ids[5..10]})))
        .await;

    let (_, active) = app.send(Method::GET, "/api/challenge/active", None).await;
    assert_eq!(active["id"], b["id"]);
    assert_eq!(app.store.active_count().await, 1);
    let retained = app.store.all_challenges().await;
    assert!(retained
        .iter()
        .any(|c| Some(c.id.as_str()) == a["id"].as_str() && !c.is_active));

    for _ in 0..2 {
        let (status, view) = app
            .send(
                Method::POST,
                "/api/challenge/complete-day",
                Some(json!({"day": 5, "reflection": "slept on it"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["completed_days"], json!([5]));
    }

    let (_, logs) = app.send(Method::GET, "/api/challenge/logs", None).await;
    assert_eq!(logs.as_array().unwrap().len(), 2);

    let uri = format!("/api/challenge/logs?challenge_id={}", a["id"].as_str().unwrap());
    let (_, logs) = app.send(Method::GET, &uri, None).await;
    assert!(logs.as_array().unwrap().is_empty());

    let (status, _) = app
        .send(Method::POST, "/api/challenge/complete-day", Some(json!({"day": 31})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stats) = app.send(Method::GET, "/api/stats", None).await;
    assert_eq!(stats["challenges_started"], 2);
    assert_eq!(stats["active_challenge"]["days_completed"], 1);
    assert_eq!(stats["active_challenge"]["progress_percent"], 3);

    let uri = format!("/api/challenge/{}", b["id"].as_str().unwrap());
    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, active) = app.send(Method::GET, "/api/challenge/active", None).await;
    assert!(active.is_null());

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeding_twice_does_not_duplicate() {
    let app = TestApp::new(&[]).await;
    let content = SeedContent::builtin().unwrap();

    let report = seed_catalog(app.store.as_ref(), &content).await.unwrap();
    assert_eq!(report.models_inserted, 0);
    assert_eq!(report.sections_inserted, 0);

    let (_, sections) = app.send(Method::GET, "/api/sections", None).await;
    assert_eq!(sections.as_array().unwrap().len(), content.sections.len());
    assert_eq!(app.model_ids().await.len(), content.models.len());
}

#[tokio::test]
async fn test_routing_errors() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app.send(Method::GET, "/api/everything", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.send(Method::PUT, "/api/journal", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = app.send(Method::POST, "/api/challenge", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_with_origin_list() {
    let app = TestApp::new(&["--cors-origins", "https://lattice.example"]).await;

    let (_, headers, _) = app
        .send_raw(Method::GET, "/api/sections", None, Some("https://lattice.example"))
        .await;
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://lattice.example"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");

    let (_, headers, _) = app
        .send_raw(Method::GET, "/api/sections", None, Some("https://other.example"))
        .await;
    assert!(headers.get("access-control-allow-origin").is_none());

    let (status, headers, _) = app
        .send_raw(Method::OPTIONS, "/api/journal", None, Some("https://lattice.example"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://lattice.example"
    );
}

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::new(&[]).await;
    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");

    let (status, body) = app.send(Method::GET, "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}
