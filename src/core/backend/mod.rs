//! Inference backends.
//!
//! A [`Backend`] turns a [`BackendRequest`] into renderable reply text. Every
//! failure (transport, status, payload) is converted to a marker-prefixed
//! string inside the backend, so callers always get something to append to
//! the transcript and the user/assistant pairing is never broken.

pub mod hosted;
pub mod local;

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::core::prompt::BackendRequest;

pub use hosted::HostedApiBackend;
pub use local::LocalDaemonBackend;

/// Prefix of every reply produced from a failed call.
pub const ERROR_MARKER: &str = "❌ Error:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    LocalDaemon,
    HostedApi,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::LocalDaemon => "local",
            BackendKind::HostedApi => "hosted",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BackendKind::LocalDaemon => "Ollama (local)",
            BackendKind::HostedApi => "Hosted inference API",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" | "local-daemon" => Some(BackendKind::LocalDaemon),
            "hosted" | "huggingface" | "hosted-api" => Some(BackendKind::HostedApi),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The backend accepts structured multi-turn history.
    pub multi_turn: bool,
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn capabilities(&self) -> Capabilities;

    /// Performs exactly one request. Never fails: errors come back as text.
    async fn call(&self, request: &BackendRequest) -> String;
}

/// Failures observed while talking to a backend. These never leave the
/// backend module; see [`Backend::call`].
#[derive(Debug)]
pub enum BackendError {
    Transport(reqwest::Error),
    Status(StatusCode),
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "{err}"),
            BackendError::Status(status) => {
                write!(f, "API returned status code {}", status.as_u16())
            }
            BackendError::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl BackendError {
    pub fn reply_text(&self) -> String {
        format!("{ERROR_MARKER} {self}")
    }
}

/// Everything needed to construct a backend, resolved from config, CLI
/// flags and the credential store.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub kind: BackendKind,
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub max_new_tokens: u32,
    pub timeout: Option<Duration>,
}

impl BackendOptions {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            base_url: None,
            token: None,
            max_new_tokens: hosted::DEFAULT_MAX_NEW_TOKENS,
            timeout: None,
        }
    }
}

pub fn build_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

pub fn build_backend(options: BackendOptions) -> Result<Arc<dyn Backend>, reqwest::Error> {
    let client = build_client(options.timeout)?;
    let backend: Arc<dyn Backend> = match options.kind {
        BackendKind::LocalDaemon => Arc::new(LocalDaemonBackend::new(
            client,
            options
                .base_url
                .unwrap_or_else(|| local::DEFAULT_BASE_URL.to_string()),
        )),
        BackendKind::HostedApi => Arc::new(
            HostedApiBackend::new(
                client,
                options
                    .base_url
                    .unwrap_or_else(|| hosted::DEFAULT_BASE_URL.to_string()),
                options.token,
            )
            .with_max_new_tokens(options.max_new_tokens),
        ),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_with_aliases() {
        assert_eq!(BackendKind::parse("Ollama"), Some(BackendKind::LocalDaemon));
        assert_eq!(BackendKind::parse("hosted"), Some(BackendKind::HostedApi));
        assert_eq!(BackendKind::parse("openai"), None);
    }

    #[test]
    fn status_errors_mention_the_code() {
        let text = BackendError::Status(StatusCode::INTERNAL_SERVER_ERROR).reply_text();
        assert_eq!(text, "❌ Error: API returned status code 500");
    }

    #[test]
    fn built_backends_declare_capabilities() {
        let local = build_backend(BackendOptions::new(BackendKind::LocalDaemon)).unwrap();
        let hosted = build_backend(BackendOptions::new(BackendKind::HostedApi)).unwrap();

        assert_eq!(local.kind(), BackendKind::LocalDaemon);
        assert!(local.capabilities().multi_turn);
        assert_eq!(hosted.kind(), BackendKind::HostedApi);
        assert!(!hosted.capabilities().multi_turn);
    }
}
