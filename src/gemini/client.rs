// Gemini API client for image edits
// Author: kelexine (https://github.com/kelexine)

use super::edit::{build_edit_request, extract_edited_image};
use super::ImageEditor;
use crate::codec::ImagePayload;
use crate::config::{ApiKey, GeminiConfig};
use crate::error::{EditorError, Result};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Client for the Google Gemini `generateContent` API.
///
/// Constructed once at startup and shared. Every call is a single request:
/// no retries, no caching.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: ApiKey,
}

impl GeminiClient {
    /// Create a new Gemini client with an explicit API key.
    pub fn new(config: &GeminiConfig, api_key: ApiKey) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls();

        // Image generation can take a while; only bound it when asked to
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }

        let http_client = builder
            .build()
            .map_err(|e| EditorError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
        })
    }

    /// Model used for every edit.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }

    /// Call Gemini `generateContent` once and parse the response.
    ///
    /// Any failure before a parsed response exists is reported as
    /// [`EditorError::Transport`].
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.generate_url();
        debug!("Calling generateContent API for model: {}", self.config.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| EditorError::Transport(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                crate::utils::logging::sanitize(&error_text)
            );
            let message = Self::extract_error_message(&error_text).unwrap_or(error_text);
            return Err(EditorError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| EditorError::Transport(format!("Failed to read response body: {}", e)))?;

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            crate::utils::logging::sanitize(&response_text.chars().take(500).collect::<String>())
        );

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            EditorError::Transport(format!("Response parsing error: {}", e))
        })
    }
}

#[async_trait]
impl ImageEditor for GeminiClient {
    async fn request_edit(&self, source: &ImagePayload, instruction: &str) -> Result<ImagePayload> {
        let start = Instant::now();
        let request = build_edit_request(source, instruction);

        let result = match self.generate_content(&request).await {
            Ok(response) => extract_edited_image(&response),
            Err(e) => Err(e),
        };

        let elapsed = start.elapsed();
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        crate::metrics::record_edit(&self.config.model, outcome, elapsed.as_secs_f64());

        match &result {
            Ok(payload) => info!(
                "Edit completed in {:?} ({} chars of image data)",
                elapsed,
                payload.data.len()
            ),
            Err(e) => error!("Gemini edit error after {:?}: {}", elapsed, e),
        }

        result
    }
}
