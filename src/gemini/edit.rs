// Edit request shaping and response interpretation
// Author: kelexine (https://github.com/kelexine)

use crate::codec::{strip_data_url_prefix, ImagePayload};
use crate::error::{EditorError, Result};
use crate::models::gemini::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use tracing::{debug, warn};

/// Build the two-part `generateContent` body: inline image first, then the
/// instruction text.
pub fn build_edit_request(source: &ImagePayload, instruction: &str) -> GenerateContentRequest {
    let raw = strip_data_url_prefix(&source.data);

    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::inline_data(source.media_type.clone(), raw),
            Part::text(instruction),
        ])],
    }
}

/// Pull the edited image out of a model response.
///
/// Only the first candidate is consulted. The first part with inline data
/// wins; text without any image means the model answered instead of editing.
pub fn extract_edited_image(response: &GenerateContentResponse) -> Result<ImagePayload> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!("Gemini blocked the prompt: {}", reason);
    }

    if let Some(reason) = response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.finish_reason.as_deref())
    {
        debug!("First candidate finish reason: {}", reason);
    }

    if let Some(usage) = &response.usage_metadata {
        debug!(
            "Token usage: prompt={:?} candidates={:?} total={:?}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    let parts = match response.first_candidate_parts() {
        Some(parts) if !parts.is_empty() => parts,
        _ => return Err(EditorError::NoContent),
    };

    if let Some(inline) = parts.iter().find_map(Part::as_inline_data) {
        debug!(
            "Found inline image ({} chars, reported as {})",
            inline.data.len(),
            inline.mime_type
        );
        return Ok(ImagePayload::canonical(inline.data.clone()));
    }

    if let Some(text) = parts.iter().find_map(Part::as_text) {
        return Err(EditorError::TextOnlyRefusal(text.to_string()));
    }

    Err(EditorError::NoImageInParts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    fn with_parts(parts: serde_json::Value) -> GenerateContentResponse {
        response(json!({
            "candidates": [{"content": {"role": "model", "parts": parts}}]
        }))
    }

    #[test]
    fn test_request_strips_prefix_and_orders_parts() {
        let source = ImagePayload::new("data:image/jpeg;base64,/9j/4AAQ", "image/jpeg");
        let request = build_edit_request(&source, "add a hat");

        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/4AAQ");
        assert_eq!(parts[1]["text"], "add a hat");
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn test_request_passes_raw_result_unchanged() {
        let previous = ImagePayload::canonical("iVBORw0KGgo");
        let request = build_edit_request(&previous, "now black and white");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["data"], "iVBORw0KGgo");
        assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
    }

    #[test]
    fn test_image_part_wins_regardless_of_position() {
        let res = with_parts(json!([
            {"text": "Sure, here is your edit."},
            {"inlineData": {"mimeType": "image/png", "data": "XXXX"}},
            {"text": "Anything else?"}
        ]));
        let payload = extract_edited_image(&res).unwrap();
        assert_eq!(payload.data, "XXXX");
        assert_eq!(payload.media_type, "image/png");
    }

    #[test]
    fn test_first_image_part_wins() {
        let res = with_parts(json!([
            {"inlineData": {"mimeType": "image/png", "data": "FIRST"}},
            {"inlineData": {"mimeType": "image/png", "data": "SECOND"}}
        ]));
        assert_eq!(extract_edited_image(&res).unwrap().data, "FIRST");
    }

    #[test]
    fn test_output_type_is_canonical() {
        let res = with_parts(json!([
            {"inlineData": {"mimeType": "image/jpeg", "data": "JPEGDATA"}}
        ]));
        assert_eq!(extract_edited_image(&res).unwrap().media_type, "image/png");
    }

    #[test]
    fn test_empty_inline_data_is_skipped() {
        let res = with_parts(json!([
            {"inlineData": {"mimeType": "image/png", "data": ""}},
            {"inlineData": {"mimeType": "image/png", "data": "REAL"}}
        ]));
        assert_eq!(extract_edited_image(&res).unwrap().data, "REAL");
    }

    #[test]
    fn test_text_only_is_refusal() {
        let res = with_parts(json!([
            {"text": "I can't edit images of real people."}
        ]));
        match extract_edited_image(&res) {
            Err(EditorError::TextOnlyRefusal(text)) => {
                assert_eq!(text, "I can't edit images of real people.")
            }
            other => panic!("expected TextOnlyRefusal, got {:?}", other),
        }
    }

    #[test]
    fn test_no_content() {
        assert!(matches!(
            extract_edited_image(&with_parts(json!([]))),
            Err(EditorError::NoContent)
        ));
        assert!(matches!(
            extract_edited_image(&response(json!({"candidates": []}))),
            Err(EditorError::NoContent)
        ));
        assert!(matches!(
            extract_edited_image(&response(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }))),
            Err(EditorError::NoContent)
        ));
    }

    #[test]
    fn test_no_image_in_parts() {
        let res = with_parts(json!([
            {"text": ""},
            {"functionCall": {"name": "noop", "args": {}}}
        ]));
        assert!(matches!(
            extract_edited_image(&res),
            Err(EditorError::NoImageInParts)
        ));
    }

    #[test]
    fn test_only_first_candidate_is_consulted() {
        let res = response(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "no"}]}},
                {"content": {"role": "model", "parts": [{"inlineData": {"mimeType": "image/png", "data": "IGNORED"}}]}}
            ]
        }));
        assert!(matches!(
            extract_edited_image(&res),
            Err(EditorError::TextOnlyRefusal(_))
        ));
    }
}
