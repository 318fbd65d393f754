//! Edit session state machine.
//!
//! The session is a tagged enum: each variant carries exactly the data that is
//! meaningful in that state, so combinations like "processing without a
//! source image" cannot be built.
//!
//! ```text
//!  Idle --select--> HasImage --submit--> Processing --ok--> HasImage
//!                      ^                     |
//!                      +--submit-- Errored <-+ err
//!  any --reset--> Idle
//! ```
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::codec::ImagePayload;
use crate::error::{EditorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Coarse status reported to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    HasImage,
    Processing,
    Errored,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::HasImage => "has_image",
            SessionStatus::Processing => "processing",
            SessionStatus::Errored => "errored",
        }
    }
}

/// Identifies one outstanding edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTicket(u64);

/// Images held by a non-idle session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImages {
    /// The upload. Never replaced by chained edits.
    pub source: ImagePayload,
    /// Latest successful edit output.
    pub result: Option<ImagePayload>,
}

impl LoadedImages {
    fn new(source: ImagePayload) -> Self {
        Self {
            source,
            result: None,
        }
    }

    /// Image the next edit should start from: the last result if there is
    /// one, otherwise the upload.
    pub fn effective_source(&self) -> &ImagePayload {
        self.result.as_ref().unwrap_or(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    HasImage(LoadedImages),
    Processing {
        images: LoadedImages,
        ticket: EditTicket,
        instruction: String,
    },
    Errored {
        images: LoadedImages,
        last_error: String,
    },
}

/// Everything needed to dispatch an edit after leaving the session lock.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub ticket: EditTicket,
    pub source: ImagePayload,
    pub instruction: String,
}

/// Result of feeding a response back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response belonged to the outstanding request and was applied.
    Applied,
    /// The session moved on (reset, or a newer request); response dropped.
    Stale,
}

/// One applied edit, newest last.
#[derive(Debug, Clone, Serialize)]
pub struct EditHistoryEntry {
    pub id: Uuid,
    pub instruction: String,
    #[serde(skip)]
    pub source: ImagePayload,
    #[serde(skip)]
    pub result: ImagePayload,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EditSession {
    state: SessionState,
    next_ticket: u64,
    history: Vec<EditHistoryEntry>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            next_ticket: 1,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::HasImage(_) => SessionStatus::HasImage,
            SessionState::Processing { .. } => SessionStatus::Processing,
            SessionState::Errored { .. } => SessionStatus::Errored,
        }
    }

    fn images(&self) -> Option<&LoadedImages> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::HasImage(images)
            | SessionState::Processing { images, .. }
            | SessionState::Errored { images, .. } => Some(images),
        }
    }

    /// The original upload, kept as the comparison reference.
    pub fn source(&self) -> Option<&ImagePayload> {
        self.images().map(|i| &i.source)
    }

    pub fn result(&self) -> Option<&ImagePayload> {
        self.images().and_then(|i| i.result.as_ref())
    }

    /// Image the next submission would be sent with.
    pub fn effective_source(&self) -> Option<&ImagePayload> {
        self.images().map(LoadedImages::effective_source)
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Errored { last_error, .. } => Some(last_error),
            _ => None,
        }
    }

    pub fn history(&self) -> &[EditHistoryEntry] {
        &self.history
    }

    /// Start over with a new upload. Rejected while a request is outstanding.
    pub fn select_image(&mut self, source: ImagePayload) -> Result<()> {
        if self.status() == SessionStatus::Processing {
            return Err(EditorError::Busy);
        }

        debug!("Image selected ({})", source.media_type);
        self.state = SessionState::HasImage(LoadedImages::new(source));
        self.history.clear();
        Ok(())
    }

    /// Move to `Processing` and hand back what must be sent.
    ///
    /// Fails with `Busy` while another request is outstanding, `NoImage` when
    /// idle, and `InvalidRequest` for blank instructions.
    pub fn begin_edit(&mut self, instruction: &str) -> Result<PendingEdit> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(EditorError::InvalidRequest(
                "Edit instruction must not be empty".to_string(),
            ));
        }

        let images = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::HasImage(images) | SessionState::Errored { images, .. } => images,
            other @ SessionState::Processing { .. } => {
                self.state = other;
                return Err(EditorError::Busy);
            }
            SessionState::Idle => return Err(EditorError::NoImage),
        };

        let ticket = EditTicket(self.next_ticket);
        self.next_ticket += 1;

        let pending = PendingEdit {
            ticket,
            source: images.effective_source().clone(),
            instruction: instruction.to_string(),
        };

        debug!("Edit {:?} started: {}", ticket, instruction);
        self.state = SessionState::Processing {
            images,
            ticket,
            instruction: pending.instruction.clone(),
        };
        Ok(pending)
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// Outcomes for anything other than the current outstanding request are
    /// dropped without touching the session.
    pub fn complete_edit(
        &mut self,
        ticket: EditTicket,
        outcome: std::result::Result<ImagePayload, &EditorError>,
    ) -> Completion {
        let (mut images, instruction) = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Processing {
                images,
                ticket: current,
                instruction,
            } if current == ticket => (images, instruction),
            other => {
                debug!("Dropping stale outcome for {:?}", ticket);
                self.state = other;
                return Completion::Stale;
            }
        };

        self.state = match outcome {
            Ok(result) => {
                self.history.push(EditHistoryEntry {
                    id: Uuid::new_v4(),
                    instruction,
                    source: images.effective_source().clone(),
                    result: result.clone(),
                    timestamp: Utc::now(),
                });
                images.result = Some(result);
                SessionState::HasImage(images)
            }
            Err(e) => SessionState::Errored {
                images,
                last_error: e.to_string(),
            },
        };
        Completion::Applied
    }

    /// Drop everything and return to `Idle`, whatever the current state.
    pub fn reset(&mut self) {
        debug!("Session reset from {}", self.status().as_str());
        self.state = SessionState::Idle;
        self.history.clear();
    }
}
