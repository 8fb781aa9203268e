use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::{Backend, BackendError, BackendKind, Capabilities};
use crate::api::{ChatMessage, LocalChatOptions, LocalChatRequest, LocalChatResponse};
use crate::core::message::Role;
use crate::core::prompt::{BackendRequest, Payload};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Non-streaming client for an Ollama-compatible `/api/chat` endpoint.
#[derive(Clone)]
pub struct LocalDaemonBackend {
    client: Client,
    base_url: String,
}

impl LocalDaemonBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn request_body(request: &BackendRequest) -> LocalChatRequest {
        let messages = match &request.payload {
            Payload::History(messages) => messages.clone(),
            Payload::Prompt(prompt) => vec![ChatMessage {
                role: Role::User.as_str().to_string(),
                content: prompt.clone(),
            }],
        };

        LocalChatRequest {
            model: request.model.as_str().to_string(),
            messages,
            stream: false,
            options: LocalChatOptions {
                temperature: request.temperature.value(),
            },
        }
    }

    async fn try_call(&self, request: &BackendRequest) -> Result<String, BackendError> {
        let url = construct_api_url(&self.base_url, "api/chat");
        debug!(%url, model = %request.model, "calling local daemon");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BackendError::Status(status));
        }

        let text = response.text().await.map_err(BackendError::Transport)?;
        let parsed: LocalChatResponse =
            serde_json::from_str(&text).map_err(|err| BackendError::Malformed(err.to_string()))?;
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl Backend for LocalDaemonBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalDaemon
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities { multi_turn: true }
    }

    async fn call(&self, request: &BackendRequest) -> String {
        match self.try_call(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "local daemon call failed");
                err.reply_text()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::ERROR_MARKER;
    use crate::core::prompt::assemble;
    use crate::core::message::Message;
    use crate::core::settings::{Settings, Temperature};
    use crate::utils::test_utils::{test_client, unreachable_base_url, TestServer};

    fn request(temperature: f32) -> BackendRequest {
        let mut settings = Settings::for_backend(BackendKind::LocalDaemon);
        settings.set_temperature(Temperature::new(temperature).unwrap());
        let history = [Message::user("earlier"), Message::assistant("answer")];
        assemble(&history, "hello", settings, Capabilities { multi_turn: true })
    }

    #[tokio::test]
    async fn returns_message_content_on_success() {
        let server =
            TestServer::start(vec![("200 OK", r#"{"message":{"content":"hi"}}"#.to_string())])
                .await;
        let backend = LocalDaemonBackend::new(test_client(), server.base_url.clone());

        let reply = backend.call(&request(0.7)).await;
        assert_eq!(reply, "hi");

        let captured = server.finish().await;
        assert_eq!(captured.len(), 1);
        assert!(captured[0].request_line.starts_with("POST /api/chat "));

        let body = captured[0].json();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["stream"], false);
        let temperature = body["options"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        let roles: Vec<_> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["user", "assistant", "user"]);
        assert_eq!(body["messages"][2]["content"], "hello");
    }

    #[tokio::test]
    async fn non_success_status_becomes_error_text() {
        let server = TestServer::start(vec![(
            "500 Internal Server Error",
            r#"{"error":"boom"}"#.to_string(),
        )])
        .await;
        let backend = LocalDaemonBackend::new(test_client(), server.base_url.clone());

        let reply = backend.call(&request(0.5)).await;

        assert!(reply.starts_with(ERROR_MARKER));
        assert!(reply.contains("500"), "reply was {reply}");
        server.finish().await;
    }

    #[tokio::test]
    async fn malformed_body_becomes_error_text() {
        let server =
            TestServer::start(vec![("200 OK", r#"{"response":"wrong shape"}"#.to_string())])
                .await;
        let backend = LocalDaemonBackend::new(test_client(), server.base_url.clone());

        let reply = backend.call(&request(0.5)).await;

        assert!(reply.starts_with(ERROR_MARKER), "reply was {reply}");
        server.finish().await;
    }

    #[tokio::test]
    async fn unreachable_daemon_becomes_error_text() {
        let backend = LocalDaemonBackend::new(test_client(), unreachable_base_url().await);

        let reply = backend.call(&request(0.5)).await;

        assert!(reply.starts_with(ERROR_MARKER), "reply was {reply}");
    }

    #[test]
    fn single_prompt_payload_is_sent_as_one_user_turn() {
        let request = BackendRequest {
            model: crate::core::settings::Model::Phi3,
            temperature: Temperature::DEFAULT,
            payload: Payload::Prompt("just this".to_string()),
        };
        let body = LocalDaemonBackend::request_body(&request);
        assert_eq!(body.model, "phi3");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].content, "just this");
    }
}
