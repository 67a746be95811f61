use httpmock::prelude::*;
use prospect_search::domain::ports::CompletionProvider;
use prospect_search::{GeminiClient, SearchError};
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(server.url("/v1beta"), "gemini-pro", "test-key")
}

#[tokio::test]
async fn test_complete_returns_candidate_text() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "test-key")
                .json_body(json!({"contents": [{"parts": [{"text": "hello"}]}]}));
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "[{\"id\":1}]"}], "role": "model"},
                    "finishReason": "STOP"
                }]
            }));
        })
        .await;

    let text = client_for(&server).complete("hello").await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(text, "[{\"id\":1}]");
}

#[tokio::test]
async fn test_error_status_surfaces_upstream_message() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(400).json_body(json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            }));
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();

    api_mock.assert_async().await;
    match err {
        SearchError::UpstreamStatus { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_without_json_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(503).body("upstream unavailable");
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();

    assert!(matches!(err, SearchError::UpstreamStatus { status: 503, .. }));
    assert_eq!(err.user_friendly_message(), "Failed to fetch results");
}

#[tokio::test]
async fn test_missing_text_path_is_unexpected_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({
                "candidates": [{"finishReason": "SAFETY"}]
            }));
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();

    assert!(matches!(err, SearchError::UnexpectedResponse { .. }));
    assert_eq!(err.user_friendly_message(), "Invalid response format from API");
}

#[tokio::test]
async fn test_non_json_success_body_is_unexpected_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();
    assert!(matches!(err, SearchError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn test_empty_error_message_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(500).json_body(json!({"error": {"code": 500, "message": ""}}));
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();

    assert!(matches!(err, SearchError::UpstreamStatus { status: 500, .. }));
    assert_eq!(err.user_friendly_message(), "Failed to fetch results");
}

#[tokio::test]
async fn test_empty_candidate_text_is_unexpected_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": ""}]}}]
            }));
        })
        .await;

    let err = client_for(&server).complete("hello").await.unwrap_err();

    assert!(matches!(err, SearchError::UnexpectedResponse { .. }));
    assert_eq!(err.user_friendly_message(), "Invalid response format from API");
}

#[tokio::test]
async fn test_api_key_never_in_error_text() {
    let client = GeminiClient::new("http://127.0.0.1:9/v1beta", "gemini-pro", "SECRET-KEY-123");

    let err = client.complete("hello").await.unwrap_err();

    assert!(!err.to_string().contains("SECRET-KEY-123"));
    assert!(!format!("{:?}", err).contains("SECRET-KEY-123"));
    assert!(!err.user_friendly_message().contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_api_key_not_sent_in_query_string() {
    let server = MockServer::start_async().await;
    let leaked = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH).query_param_exists("key");
            then.status(200).json_body(json!({"candidates": []}));
        })
        .await;
    let header = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "test-key");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "[]"}]}}]
            }));
        })
        .await;

    let text = client_for(&server).complete("hello").await.unwrap();

    assert_eq!(text, "[]");
    header.assert_async().await;
    leaked.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    // 沒有服務在監聽的埠
    let client = GeminiClient::new("http://127.0.0.1:9/v1beta", "gemini-pro", "test-key");

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
}
