// Gemini client tests against a mocked generateContent endpoint
// Author: kelexine (https://github.com/kelexine)

use mockito::Matcher;
use nano_banana_editor::codec::ImagePayload;
use nano_banana_editor::config::{ApiKey, GeminiConfig};
use nano_banana_editor::error::EditorError;
use nano_banana_editor::gemini::{GeminiClient, ImageEditor};
use serde_json::json;

const EDIT_PATH: &str = "/models/gemini-2.5-flash-image:generateContent";

fn client_for(base_url: String) -> GeminiClient {
    let config = GeminiConfig {
        api_base_url: base_url,
        ..GeminiConfig::default()
    };
    GeminiClient::new(&config, ApiKey::new("test-key")).unwrap()
}

fn upload() -> ImagePayload {
    ImagePayload::new("data:image/jpeg;base64,/9j/4AAQSkZJRg==", "image/jpeg")
}

fn parts_body(parts: serde_json::Value) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 1290, "candidatesTokenCount": 1290, "totalTokenCount": 2580}
    })
    .to_string()
}

#[tokio::test]
async fn test_edit_sends_normalized_image_and_instruction() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", EDIT_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Json(json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/4AAQSkZJRg=="}},
                    {"text": "add a hat"}
                ]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(parts_body(json!([
            {"text": "Here is the edited photo."},
            {"inlineData": {"mimeType": "image/png", "data": "RESULT_X"}}
        ])))
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.request_edit(&upload(), "add a hat").await.unwrap();

    assert_eq!(result.data, "RESULT_X");
    assert_eq!(result.media_type, "image/png");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chained_edit_sends_raw_result_unchanged() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", EDIT_PATH)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "RESULT_X"}},
                    {"text": "now make it black and white"}
                ]
            }]
        })))
        .with_status(200)
        .with_body(parts_body(json!([
            {"inlineData": {"mimeType": "image/png", "data": "RESULT_Y"}}
        ])))
        .create_async()
        .await;

    let client = client_for(server.url());
    let previous = ImagePayload::canonical("RESULT_X");
    let result = client
        .request_edit(&previous, "now make it black and white")
        .await
        .unwrap();

    assert_eq!(result.data, "RESULT_Y");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_text_only_response_is_refusal() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", EDIT_PATH)
        .with_status(200)
        .with_body(parts_body(json!([
            {"text": "I'm unable to edit this image."}
        ])))
        .create_async()
        .await;

    let client = client_for(server.url());
    match client.request_edit(&upload(), "add a hat").await {
        Err(EditorError::TextOnlyRefusal(text)) => {
            assert_eq!(text, "I'm unable to edit this image.")
        }
        other => panic!("expected TextOnlyRefusal, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_parts_is_no_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", EDIT_PATH)
        .with_status(200)
        .with_body(parts_body(json!([])))
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.request_edit(&upload(), "add a hat").await;
    assert!(matches!(result, Err(EditorError::NoContent)));
}

#[tokio::test]
async fn test_blocked_prompt_is_no_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", EDIT_PATH)
        .with_status(200)
        .with_body(r#"{"promptFeedback": {"blockReason": "PROHIBITED_CONTENT"}}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.request_edit(&upload(), "add a hat").await;
    assert!(matches!(result, Err(EditorError::NoContent)));
}

#[tokio::test]
async fn test_http_error_is_transport_error_with_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", EDIT_PATH)
        .with_status(400)
        .with_body(
            r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(server.url());
    match client.request_edit(&upload(), "add a hat").await {
        Err(EditorError::Transport(message)) => {
            assert!(message.contains("400"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected Transport, got {:?}", other),
    }

    // No retries
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unparseable_body_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", EDIT_PATH)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.request_edit(&upload(), "add a hat").await;
    assert!(matches!(result, Err(EditorError::Transport(_))));
}

#[tokio::test]
async fn test_connection_error_is_transport_error() {
    // Nothing listens on port 1
    let client = client_for("http://127.0.0.1:1".to_string());
    let result = client.request_edit(&upload(), "add a hat").await;
    assert!(matches!(result, Err(EditorError::Transport(_))));
}
