//! Integration tests for the Gemini generation backend.
//!
//! Drives the client against a wiremock server to verify the request
//! shape, the API-key query parameter, and error mapping.

use scriva_core::{Error, GenerationBackend};
use scriva_inference::gemini::GeminiBackend;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn candidate_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn generate_sends_prompt_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [ { "parts": [ { "text": "Summarize this" } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response("A summary.")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_config(
        server.uri(),
        "gemini-pro".to_string(),
        "test-key".to_string(),
    );

    let text = backend.generate("Summarize this").await.unwrap();
    assert_eq!(text, "A summary.");
}

#[tokio::test]
async fn non_success_status_maps_to_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_config(
        server.uri(),
        "gemini-pro".to_string(),
        "test-key".to_string(),
    );

    let err = backend.generate("prompt").await.unwrap_err();
    match err {
        Error::Provider(msg) => {
            assert!(msg.contains("429"), "expected status in message: {}", msg);
            assert!(msg.contains("rate limited"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_candidates_maps_to_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_config(
        server.uri(),
        "gemini-pro".to_string(),
        "test-key".to_string(),
    );

    let err = backend.generate("prompt").await.unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
}

#[tokio::test]
async fn malformed_body_maps_to_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = GeminiBackend::with_config(
        server.uri(),
        "gemini-pro".to_string(),
        "test-key".to_string(),
    );

    let err = backend.generate("prompt").await.unwrap_err();
    match err {
        Error::Provider(msg) => assert!(msg.contains("parse")),
        other => panic!("expected provider error, got {:?}", other),
    }
}
