use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{Backend, BackendError, BackendKind, Capabilities};
use crate::api::{HostedGenerateRequest, HostedGeneration, HostedParameters};
use crate::core::prompt::{BackendRequest, Payload};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// Shown in place of a reply whenever the hosted API answers with anything
/// other than a non-empty generation list.
pub const WARMING_UP_MESSAGE: &str =
    "⚠️ The model may be warming up. Please try again in a moment.";

/// Text-generation client for a hosted inference API that takes one flat
/// prompt per request.
#[derive(Clone)]
pub struct HostedApiBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_new_tokens: u32,
}

impl HostedApiBackend {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.filter(|token| !token.trim().is_empty()),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request_body(&self, request: &BackendRequest) -> HostedGenerateRequest {
        // Only the newest user message is ever sent here; history collapses to
        // its last entry if a multi-turn payload arrives anyway.
        let inputs = match &request.payload {
            Payload::Prompt(prompt) => prompt.clone(),
            Payload::History(messages) => messages
                .last()
                .map(|message| message.content.clone())
                .unwrap_or_default(),
        };

        HostedGenerateRequest {
            inputs,
            parameters: HostedParameters {
                temperature: request.temperature.value(),
                max_new_tokens: self.max_new_tokens,
            },
        }
    }

    async fn try_call(&self, request: &BackendRequest) -> Result<String, BackendError> {
        let url = construct_api_url(&self.base_url, request.model.as_str());
        debug!(%url, model = %request.model, has_token = self.has_token(), "calling hosted api");

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(request));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(BackendError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(BackendError::Transport)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), body = %text, "hosted api returned an error status");
            return Ok(WARMING_UP_MESSAGE.to_string());
        }

        Ok(first_generation(&text).unwrap_or_else(|| WARMING_UP_MESSAGE.to_string()))
    }
}

/// The first element's `generated_text`, if the body is a non-empty list of
/// generations.
fn first_generation(body: &str) -> Option<String> {
    serde_json::from_str::<Vec<HostedGeneration>>(body)
        .ok()?
        .into_iter()
        .next()
        .map(|generation| generation.generated_text)
}

#[async_trait]
impl Backend for HostedApiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::HostedApi
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities { multi_turn: false }
    }

    async fn call(&self, request: &BackendRequest) -> String {
        match self.try_call(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "hosted api call failed");
                err.reply_text()
            }
        }
    }
}
