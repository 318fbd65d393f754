// Test doubles for the remote image editor
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use nano_banana_editor::codec::ImagePayload;
use nano_banana_editor::error::{EditorError, Result};
use nano_banana_editor::gemini::ImageEditor;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Tiny 1x1 PNG
pub const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Replies with queued outcomes in order and records every call.
#[derive(Default)]
pub struct ScriptedEditor {
    responses: Mutex<VecDeque<Result<ImagePayload>>>,
    calls: Mutex<Vec<(ImagePayload, String)>>,
}

impl ScriptedEditor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, data: &str) {
        self.responses
            .lock()
            .push_back(Ok(ImagePayload::canonical(data)));
    }

    pub fn push_err(&self, err: EditorError) {
        self.responses.lock().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<(ImagePayload, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ImageEditor for ScriptedEditor {
    async fn request_edit(&self, source: &ImagePayload, instruction: &str) -> Result<ImagePayload> {
        self.calls
            .lock()
            .push((source.clone(), instruction.to_string()));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(EditorError::NoContent))
    }
}

/// Holds every request until `release` is notified.
pub struct GatedEditor {
    pub release: Notify,
    pub calls: AtomicUsize,
    pub reply: ImagePayload,
}

impl GatedEditor {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            reply: ImagePayload::canonical(reply),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageEditor for GatedEditor {
    async fn request_edit(&self, _source: &ImagePayload, _instruction: &str) -> Result<ImagePayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

pub fn png_bytes() -> Vec<u8> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(PNG_B64)
        .expect("valid test PNG")
}
