// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;
pub mod edit;

pub use client::GeminiClient;
pub use edit::{build_edit_request, extract_edited_image};

use crate::codec::ImagePayload;
use crate::error::Result;
use async_trait::async_trait;

/// Something that can turn a source image and an instruction into an edited image.
///
/// [`GeminiClient`] is the production implementation; the session controller
/// only sees this trait so the remote service can be swapped out.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Send one edit request. The source may still carry a data URL prefix.
    async fn request_edit(&self, source: &ImagePayload, instruction: &str) -> Result<ImagePayload>;
}
