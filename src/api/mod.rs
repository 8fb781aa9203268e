//! Wire payloads for the two inference backends.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/chat` on the local daemon.
#[derive(Serialize, Debug)]
pub struct LocalChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: LocalChatOptions,
}

#[derive(Serialize, Debug)]
pub struct LocalChatOptions {
    pub temperature: f32,
}

#[derive(Deserialize, Debug)]
pub struct LocalChatResponse {
    pub message: LocalResponseMessage,
}

#[derive(Deserialize, Debug)]
pub struct LocalResponseMessage {
    pub content: String,
}

/// Body of a text-generation request on the hosted API.
#[derive(Serialize, Debug)]
pub struct HostedGenerateRequest {
    pub inputs: String,
    pub parameters: HostedParameters,
}

#[derive(Serialize, Debug)]
pub struct HostedParameters {
    pub temperature: f32,
    pub max_new_tokens: u32,
}

/// One element of the hosted API's response array.
#[derive(Deserialize, Debug)]
pub struct HostedGeneration {
    pub generated_text: String,
}
