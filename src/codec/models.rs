// Image payload models and types
// Author: kelexine (https://github.com/kelexine)

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum accepted upload size: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media type of every image returned by the edit model.
pub const CANONICAL_OUTPUT_TYPE: &str = "image/png";

/// Declared type used when nothing better is known. Never passes validation.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Base64-encoded image plus its media type.
///
/// `data` may carry a `data:` URL prefix straight out of the encoder; it is
/// normalized at the request boundary before leaving the process.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub data: String,
    pub media_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Payload in the canonical output encoding, as returned by the model.
    pub fn canonical(data: impl Into<String>) -> Self {
        Self::new(data, CANONICAL_OUTPUT_TYPE)
    }
}

// Image data can be megabytes of base64; keep Debug output readable
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// A user-selected file before encoding.
#[derive(Debug, Clone)]
pub struct RawImageFile {
    /// Original file name, if known. Informational only.
    pub name: Option<String>,
    /// Media type declared by the uploader (browser, Content-Type header, sniffing).
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

impl RawImageFile {
    pub fn new(declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: None,
            declared_type: declared_type.into(),
            bytes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read a file from disk. The declared type comes from the file's magic
    /// bytes, then its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            EditorError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        let declared_type = super::detect_mime_type(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(ImageFormat::from_extension)
                    .map(|format| format.mime_type())
            })
            .unwrap_or(UNKNOWN_MEDIA_TYPE);

        let mut file = Self::new(declared_type, bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            file = file.with_name(name);
        }
        Ok(file)
    }
}

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Heic,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Heic => "image/heic",
        }
    }

    /// Try to detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "heic" => Some(ImageFormat::Heic),
            _ => None,
        }
    }
}

/// Validate that the declared type belongs to the image category.
pub fn validate_media_type(declared_type: &str) -> Result<()> {
    if declared_type.starts_with("image/") {
        Ok(())
    } else {
        Err(EditorError::InvalidType(declared_type.to_string()))
    }
}

/// Validate image data size against `limit` bytes.
pub fn validate_image_size(data_len: usize, limit: usize) -> Result<()> {
    if data_len > limit {
        return Err(EditorError::TooLarge {
            size: data_len,
            limit,
        });
    }
    Ok(())
}
