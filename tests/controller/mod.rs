//! HTTP API tests against mocked providers.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use sclh::server::router;
use sclh_test_utils::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::setup::{test_config, test_state};

/// Tests the lookup route end to end.
///
/// Verifies that names are decoded from the request body, looked up through both providers
/// and returned with the accepted count.
///
/// Expected: 200 with one profile, the unknown name omitted
#[tokio::test]
async fn looks_up_posted_names() {
    let test = TestBuilder::new()
        .with_search_endpoint("Mynxee", vec![5], 1)
        .with_search_endpoint("Nobody", vec![], 1)
        .with_character_endpoint(5, factory::mock_character("Mynxee", 1_000_125, None), 1)
        .with_corporation_endpoint(1_000_125, factory::mock_corporation("Center for Advanced Studies"), 1)
        .with_corporation_history_endpoint(
            5,
            vec![factory::mock_history_entry(1_000_125, 1, "2015-03-24T11:37:00Z")],
            1,
        )
        .with_character_stats_endpoint(5, factory::mock_empty_stats(), 1)
        .with_corporation_stats_endpoint(1_000_125, 0.0, 1)
        .build()
        .await;
    let app = router::routes().with_state(test_state(&test, test_config()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/lookup")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "names": ["Mynxee", " Nobody "] }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["accepted"], 2);
    assert_eq!(body["characters"].as_array().unwrap().len(), 1);
    assert_eq!(body["characters"][0]["name"], "Space Mom");
    assert_eq!(body["characters"][0]["is_npc_corp"], true);
    assert_eq!(body["characters"][0]["alliance_name"], "");
    test.assert_mocks();
}

/// Tests rejecting a malformed request body.
///
/// Expected: a 4xx status without any upstream request
#[tokio::test]
async fn rejects_malformed_body() {
    let test = TestBuilder::new().build().await;
    let app = router::routes().with_state(test_state(&test, test_config()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/lookup")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"names": "Mynxee"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}
