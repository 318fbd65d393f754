// Session controller: drives the state machine and the edit client together
// Author: kelexine (https://github.com/kelexine)

use super::state::{Completion, EditSession, SessionStatus};
use crate::codec::{encode_image, ImagePayload, RawImageFile};
use crate::error::{EditorError, Result};
use crate::gemini::ImageEditor;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Read-only view of the session for the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub has_source: bool,
    pub has_result: bool,
    /// Media type of the original upload.
    pub media_type: Option<String>,
    pub last_error: Option<String>,
    pub history_len: usize,
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub instruction: String,
    pub timestamp: DateTime<Utc>,
}

/// Shared handle to one edit session and the editor serving it.
///
/// The session lock is only taken for state transitions, never across the
/// remote call.
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<EditSession>>,
    editor: Arc<dyn ImageEditor>,
    max_upload_bytes: usize,
}

impl SessionController {
    pub fn new(editor: Arc<dyn ImageEditor>, max_upload_bytes: usize) -> Self {
        Self {
            session: Arc::new(Mutex::new(EditSession::new())),
            editor,
            max_upload_bytes,
        }
    }

    /// Validate, encode and install a new source image.
    pub async fn load_image(&self, file: RawImageFile) -> Result<SessionSnapshot> {
        let payload = match encode_image(file, self.max_upload_bytes).await {
            Ok(payload) => {
                crate::metrics::record_upload("accepted");
                payload
            }
            Err(e) => {
                warn!("Upload rejected: {}", e);
                crate::metrics::record_upload(e.kind());
                return Err(e);
            }
        };

        self.select_image(payload)
    }

    /// Install an already-encoded source image.
    pub fn select_image(&self, payload: ImagePayload) -> Result<SessionSnapshot> {
        let mut session = self.session.lock();
        session.select_image(payload)?;
        crate::metrics::record_transition(SessionStatus::HasImage.as_str());
        Ok(Self::snapshot_of(&session))
    }

    /// Run one edit against the effective source image.
    ///
    /// Returns the new result on success. Edit failures are recorded in the
    /// session (`Errored`) and also returned. If the session was reset while
    /// the request was in flight the outcome is dropped and `Discarded` is
    /// returned.
    ///
    /// The remote call and its completion run on a spawned task, so the
    /// session always leaves `Processing` even if this future is dropped
    /// (for example when an HTTP client disconnects mid-edit).
    pub async fn submit(&self, instruction: &str) -> Result<ImagePayload> {
        let pending = {
            let mut session = self.session.lock();
            let pending = session.begin_edit(instruction)?;
            crate::metrics::record_transition(SessionStatus::Processing.as_str());
            pending
        };

        info!("Submitting edit: {}", pending.instruction);
        let ticket = pending.ticket;
        let session = Arc::clone(&self.session);
        let editor = Arc::clone(&self.editor);

        let task = tokio::spawn(async move {
            let outcome = editor
                .request_edit(&pending.source, &pending.instruction)
                .await;

            let mut session = session.lock();
            match session.complete_edit(pending.ticket, outcome.as_ref().cloned()) {
                Completion::Applied => {
                    crate::metrics::record_transition(session.status().as_str());
                    outcome
                }
                Completion::Stale => {
                    warn!("Edit finished after the session was reset; result dropped");
                    Err(EditorError::Discarded)
                }
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The editor panicked; release the ticket so the session is usable again
                let err = EditorError::Internal(format!("Edit task failed: {}", e));
                self.session.lock().complete_edit(ticket, Err(&err));
                Err(err)
            }
        }
    }

    /// Return to `Idle`. Any in-flight request is left to finish and ignored.
    pub fn reset(&self) -> SessionSnapshot {
        let mut session = self.session.lock();
        session.reset();
        crate::metrics::record_transition(SessionStatus::Idle.as_str());
        info!("Session reset");
        Self::snapshot_of(&session)
    }

    pub fn status(&self) -> SessionStatus {
        self.session.lock().status()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        Self::snapshot_of(&self.session.lock())
    }

    /// The original upload, if any.
    pub fn source(&self) -> Option<ImagePayload> {
        self.session.lock().source().cloned()
    }

    /// The latest edit result, if any.
    pub fn result(&self) -> Option<ImagePayload> {
        self.session.lock().result().cloned()
    }

    fn snapshot_of(session: &EditSession) -> SessionSnapshot {
        SessionSnapshot {
            status: session.status(),
            has_source: session.source().is_some(),
            has_result: session.result().is_some(),
            media_type: session.source().map(|s| s.media_type.clone()),
            last_error: session.last_error().map(str::to_string),
            history_len: session.history().len(),
            history: session
                .history()
                .iter()
                .map(|entry| HistoryItem {
                    id: entry.id,
                    instruction: entry.instruction.clone(),
                    timestamp: entry.timestamp,
                })
                .collect(),
        }
    }
}
