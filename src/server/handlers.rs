// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::codec::{
    decode_payload, download_data_url, download_file_name, to_data_url, RawImageFile,
    CANONICAL_OUTPUT_TYPE, UNKNOWN_MEDIA_TYPE,
};
use crate::error::{EditorError, Result};
use crate::session::{SessionSnapshot, SessionStatus};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Optional header carrying the uploaded file's name.
pub const FILE_NAME_HEADER: &str = "x-file-name";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub session: SessionStatus,
    pub timestamp: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.gemini.model.clone(),
        session: state.controller.status(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

pub async fn session_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.snapshot())
}

/// Handler for image selection. The raw request body is the file; its
/// `Content-Type` is the declared media type.
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SessionSnapshot>> {
    let declared_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string());

    info!("Received upload: {} bytes, {}", body.len(), declared_type);

    let mut file = RawImageFile::new(declared_type, body.to_vec());
    if let Some(name) = headers.get(FILE_NAME_HEADER).and_then(|v| v.to_str().ok()) {
        file = file.with_name(name);
    }

    let snapshot = state.controller.load_image(file).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    pub instruction: String,
}

#[derive(Debug, Serialize)]
pub struct EditResult {
    pub session: SessionSnapshot,
    pub result: ImageView,
}

/// Image ready for display in an `<img>` tag.
#[derive(Debug, Serialize)]
pub struct ImageView {
    pub media_type: String,
    pub data_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Handler for prompt submission. Blocks until the model answers.
pub async fn edit_handler(
    State(state): State<AppState>,
    Json(body): Json<EditBody>,
) -> Result<Json<EditResult>> {
    let instruction = body.instruction.trim();
    if instruction.is_empty() {
        return Err(EditorError::InvalidRequest(
            "Describe your edit (e.g., 'Make it look like a sketch', 'Add a hat')".to_string(),
        ));
    }

    debug!("Edit requested: {}", instruction);
    let result = state.controller.submit(instruction).await?;

    Ok(Json(EditResult {
        session: state.controller.snapshot(),
        result: ImageView {
            media_type: CANONICAL_OUTPUT_TYPE.to_string(),
            data_url: download_data_url(&result),
            file_name: Some(download_file_name()),
        },
    }))
}

pub async fn reset_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.reset())
}

pub async fn original_handler(State(state): State<AppState>) -> Result<Json<ImageView>> {
    let source = state.controller.source().ok_or(EditorError::NoImage)?;
    Ok(Json(ImageView {
        media_type: source.media_type.clone(),
        data_url: to_data_url(&source),
        file_name: None,
    }))
}

pub async fn result_handler(State(state): State<AppState>) -> Result<Json<ImageView>> {
    let result = state.controller.result().ok_or(EditorError::NoImage)?;
    Ok(Json(ImageView {
        media_type: CANONICAL_OUTPUT_TYPE.to_string(),
        data_url: download_data_url(&result),
        file_name: Some(download_file_name()),
    }))
}

/// Raw PNG bytes of the latest result, as a file download.
pub async fn download_handler(State(state): State<AppState>) -> Result<Response> {
    let result = state.controller.result().ok_or(EditorError::NoImage)?;
    let bytes = decode_payload(&result)?;

    Ok((
        [
            (header::CONTENT_TYPE, CANONICAL_OUTPUT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_file_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}
