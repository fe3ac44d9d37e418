//! Image and reply generation
//!
//! Two backends behind one interface: [`StubGateway`] simulates the
//! service with fixed delays and canned replies (the development default),
//! and [`HttpGateway`] calls a hosted JSON generation API with the
//! configured key.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use decora_core::AppConfig;

use crate::error::{Error, Result};
use crate::persistence::check_status;

/// Boundary interface to the generation service.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Produce an image reference for a design prompt.
    async fn generate_image(&self, prompt: &str) -> Result<String>;

    /// Produce an assistant reply to a chat message.
    async fn generate_reply(&self, message: &str) -> Result<String>;
}

/// Delay before the stub "finishes" generating an image.
const STUB_IMAGE_DELAY: Duration = Duration::from_secs(3);
/// Delay before the stub "finishes" composing a reply.
const STUB_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Canned assistant replies for the stub backend.
const STUB_REPLIES: &[&str] = &[
    "That's a great choice! What kind of mood are you trying to create?",
    "Interesting! Tell me more about your preferences for colors and materials.",
    "I can help with that. Are there any specific elements you'd like to include or exclude?",
];

/// Simulated generation backend with fixed delays.
pub struct StubGateway {
    image_delay: Duration,
    reply_delay: Duration,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            image_delay: STUB_IMAGE_DELAY,
            reply_delay: STUB_REPLY_DELAY,
        }
    }

    /// Zero-delay variant for tests.
    pub fn instant() -> Self {
        Self {
            image_delay: Duration::ZERO,
            reply_delay: Duration::ZERO,
        }
    }

    /// Placeholder image reference derived from the prompt text.
    fn placeholder_url(prompt: &str) -> String {
        let text: String = prompt
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '+' })
            .collect();
        format!("https://via.placeholder.com/600x400?text={}", text)
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationGateway for StubGateway {
    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        debug!(prompt, "stub image generation");
        tokio::time::sleep(self.image_delay).await;
        Ok(Self::placeholder_url(prompt))
    }

    #[instrument(skip(self, message))]
    async fn generate_reply(&self, message: &str) -> Result<String> {
        debug!(chars = message.len(), "stub reply generation");
        tokio::time::sleep(self.reply_delay).await;

        let reply = STUB_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(STUB_REPLIES[0]);
        Ok(reply.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    image_url: String,
}

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReplyResponse {
    reply: String,
}

/// JSON API client for a hosted generation service.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.generation_url.trim_end_matches('/').to_string(),
            api_key: config.generation_key.clone(),
            timeout: config.request_timeout(),
        }
    }

    async fn post_json<T>(&self, path: &str, body: &impl Serialize) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if self.base_url.is_empty() {
            return Err(Error::Unconfigured("generation_url"));
        }

        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body);

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let response = check_status(response).await?;

        let value = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        Ok(value)
    }
}

#[async_trait]
impl GenerationGateway for HttpGateway {
    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let response: ImageResponse = self
            .post_json("/v1/images", &ImageRequest { prompt })
            .await?;
        Ok(response.image_url)
    }

    #[instrument(skip(self, message))]
    async fn generate_reply(&self, message: &str) -> Result<String> {
        let response: ReplyResponse = self
            .post_json("/v1/replies", &ReplyRequest { message })
            .await?;
        Ok(response.reply)
    }
}
