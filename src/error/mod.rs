// Error types for nano-banana-editor
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Please upload a valid image file (JPG, PNG, WebP). Got: {0}")]
    InvalidType(String),

    #[error("File size too large ({size} bytes). Please upload an image under {}.", format_limit(.limit))]
    TooLarge { size: usize, limit: usize },

    #[error("Gemini request failed: {0}")]
    Transport(String),

    #[error("No content generated from Gemini.")]
    NoContent,

    #[error("The model returned text instead of an image: \"{0}\"")]
    TextOnlyRefusal(String),

    #[error("No image data found in the response.")]
    NoImageInParts,

    #[error("An edit is already in progress")]
    Busy,

    #[error("No image loaded")]
    NoImage,

    #[error("Edit result discarded: the session was reset while it was in flight")]
    Discarded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EditorError {
    /// True for failures produced by the remote edit call, as opposed to
    /// local validation or session misuse.
    pub fn is_edit_failure(&self) -> bool {
        matches!(
            self,
            EditorError::Transport(_)
                | EditorError::NoContent
                | EditorError::TextOnlyRefusal(_)
                | EditorError::NoImageInParts
        )
    }

    /// Short machine-readable label, also used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorError::InvalidType(_) => "invalid_type",
            EditorError::TooLarge { .. } => "too_large",
            EditorError::Transport(_) => "transport_error",
            EditorError::NoContent => "no_content",
            EditorError::TextOnlyRefusal(_) => "text_only_refusal",
            EditorError::NoImageInParts => "no_image_in_parts",
            EditorError::Busy => "busy",
            EditorError::NoImage => "no_image",
            EditorError::Discarded => "discarded",
            EditorError::InvalidRequest(_) => "invalid_request_error",
            EditorError::Config(_) | EditorError::ConfigParsing(_) => "configuration_error",
            _ => "api_error",
        }
    }
}

/// Human-readable upload limit: whole MB or KB when exact, bytes otherwise.
fn format_limit(limit: &usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    match *limit {
        0 => "0 bytes".to_string(),
        n if n % MIB == 0 => format!("{}MB", n / MIB),
        n if n % KIB == 0 => format!("{}KB", n / KIB),
        n => format!("{} bytes", n),
    }
}

// Convert EditorError to HTTP responses for Axum
impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let status = match &self {
            EditorError::InvalidType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            EditorError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            EditorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            EditorError::Busy | EditorError::Discarded => StatusCode::CONFLICT,
            EditorError::NoImage => StatusCode::NOT_FOUND,
            _ if self.is_edit_failure() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
