// Image encoding and data URL handling
// Author: kelexine (https://github.com/kelexine)

use super::models::{
    validate_image_size, validate_media_type, ImagePayload, RawImageFile, CANONICAL_OUTPUT_TYPE,
};
use crate::error::{EditorError, Result};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Matches a leading `data:image/<subtype>;base64,` header.
static DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[\w.+-]+;base64,").expect("valid data URL regex"));

/// Validate and encode a user-selected file.
///
/// The returned payload keeps the `data:` URL prefix; it is stripped later by
/// the edit client. Encoding runs on the blocking pool so large files do not
/// stall the executor.
pub async fn encode_image(file: RawImageFile, max_bytes: usize) -> Result<ImagePayload> {
    validate_media_type(&file.declared_type)?;
    validate_image_size(file.bytes.len(), max_bytes)?;

    debug!(
        "Encoding {} ({} bytes, {})",
        file.name.as_deref().unwrap_or("upload"),
        file.bytes.len(),
        file.declared_type
    );

    let RawImageFile {
        declared_type,
        bytes,
        ..
    } = file;

    tokio::task::spawn_blocking(move || {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let data = format!("data:{};base64,{}", declared_type, encoded);
        ImagePayload::new(data, declared_type)
    })
    .await
    .map_err(|e| EditorError::Internal(format!("Encoding task failed: {}", e)))
}

/// Remove a leading image data URL prefix. Input without one is returned as-is,
/// so a raw model result passes through unchanged.
pub fn strip_data_url_prefix(data: &str) -> &str {
    match DATA_URL_PREFIX.find(data) {
        Some(m) => &data[m.end()..],
        None => data,
    }
}

/// Render a payload as a data URL using its own media type.
pub fn to_data_url(payload: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        payload.media_type,
        strip_data_url_prefix(&payload.data)
    )
}

/// Data URL for saving a result. Always PNG-typed, whatever was uploaded.
pub fn download_data_url(payload: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        CANONICAL_OUTPUT_TYPE,
        strip_data_url_prefix(&payload.data)
    )
}

/// Suggested file name for a downloaded result.
pub fn download_file_name() -> String {
    format!("nano-banana-edit-{}.png", chrono::Utc::now().timestamp_millis())
}

/// Decode a payload (with or without prefix) back into raw bytes.
pub fn decode_payload(payload: &ImagePayload) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(strip_data_url_prefix(&payload.data))
        .map_err(|e| EditorError::InvalidRequest(format!("Invalid base64 image data: {}", e)))
}

/// Detect MIME type from magic bytes at start of image data
pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }

    if data.starts_with(b"\xFF\xD8\xFF") {
        Some("image/jpeg")
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
        Some("image/webp")
    } else if data[4..12] == *b"ftypheic" || data[4..12] == *b"ftypheix" {
        Some("image/heic")
    } else {
        None
    }
}
