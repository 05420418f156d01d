//! HTTP 接入层集成测试（Mock LLM）

#![cfg(feature = "web")]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rapid_aid::intake::{create_router, IntakeState};
use rapid_aid::llm::MockLlmClient;
use rapid_aid::store::RequestStore;
use rapid_aid::triage::TriageService;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let state = Arc::new(IntakeState {
        triage: TriageService::from_llm(Arc::new(MockLlmClient), Duration::from_secs(1)),
        store: RequestStore::new(),
    });
    create_router(state, true)
}

fn submit(form: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/requests")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_root() {
    let (status, body) = send(&app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rapid Aid Matcher Backend is running.");
}

#[tokio::test]
async fn test_submit_and_read_back() {
    let app = app();

    let (status, body) = send(
        &app,
        submit("name=Ana&address=12+Elm+St&request_text=++Urgent%3A+no+clean+water+here++"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["address"], "12 Elm St");
    assert_eq!(body["request_text"], "Urgent: no clean water here");
    assert_eq!(body["category"], "water");
    assert_eq!(body["priority_score"], 85);
    assert_eq!(body["tags"], serde_json::json!(["water", "urgent"]));
    assert!(body["created_at"].as_str().unwrap().ends_with('Z'));

    let (status, body) = send(&app, submit("address=4+Oak+Ave&request_text=we+are+hungry")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["name"], "Anonymous");
    assert_eq!(body["category"], "food");
    assert_eq!(body["tags"], serde_json::json!(["food"]));

    let (status, body) = send(&app, get("/api/requests")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let (status, body) = send(&app, get("/api/requests/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_text"], "we are hungry");

    let (status, _) = send(&app, get("/api/requests/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_fields_are_rejected_without_consuming_ids() {
    let app = app();

    let (status, body) = send(&app, submit("name=Ana&address=+++&request_text=need+water")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "address");

    let (status, body) = send(&app, submit("address=1+Main+St")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "request_text");

    let (_, body) = send(&app, get("/api/requests")).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = send(&app, submit("address=1+Main+St&request_text=need+water")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_filters_and_stats() {
    let app = app();
    send(&app, submit("address=a&request_text=no+water+urgent")).await;
    send(&app, submit("address=b&request_text=need+a+doctor")).await;
    send(&app, submit("address=c&request_text=bottled+water+please")).await;

    let (_, body) = send(&app, get("/api/requests?category=WATER")).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (_, body) = send(&app, get("/api/requests?urgent=true")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);

    let (status, body) = send(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["urgent"], 1);
    assert_eq!(body["by_category"]["water"], 2);
    assert_eq!(body["by_category"]["medical"], 1);
    assert_eq!(body["by_category"]["shelter"], 0);
}
