//! Builds the outbound request for one turn.
//!
//! Which shape is produced is decided by the backend's `multi_turn`
//! capability and nothing else:
//! - multi-turn backends receive every earlier user/assistant turn and the
//!   new message as structured history;
//! - single-prompt backends receive only the new message as flat text. Their
//!   replies therefore have no memory of earlier turns even though those
//!   turns remain on screen and in the transcript.

use crate::api::ChatMessage;
use crate::core::backend::Capabilities;
use crate::core::message::{Message, Role};
use crate::core::settings::{Model, Settings, Temperature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    FullHistory,
    SinglePrompt,
}

impl PromptMode {
    pub fn for_capabilities(capabilities: Capabilities) -> Self {
        if capabilities.multi_turn {
            PromptMode::FullHistory
        } else {
            PromptMode::SinglePrompt
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    History(Vec<ChatMessage>),
    Prompt(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub model: Model,
    pub temperature: Temperature,
    pub payload: Payload,
}

impl BackendRequest {
    pub fn mode(&self) -> PromptMode {
        match self.payload {
            Payload::History(_) => PromptMode::FullHistory,
            Payload::Prompt(_) => PromptMode::SinglePrompt,
        }
    }
}

/// `history` is the visible transcript before the new message was appended.
/// The system preamble is never forwarded.
pub fn assemble(
    history: &[Message],
    user_text: &str,
    settings: Settings,
    capabilities: Capabilities,
) -> BackendRequest {
    let payload = match PromptMode::for_capabilities(capabilities) {
        PromptMode::FullHistory => {
            let mut messages: Vec<ChatMessage> = history
                .iter()
                .filter(|message| !message.is_system())
                .map(ChatMessage::from)
                .collect();
            messages.push(ChatMessage {
                role: Role::User.as_str().to_string(),
                content: user_text.to_string(),
            });
            Payload::History(messages)
        }
        PromptMode::SinglePrompt => Payload::Prompt(user_text.to_string()),
    };

    BackendRequest {
        model: settings.model(),
        temperature: settings.temperature(),
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendKind;

    fn history() -> Vec<Message> {
        vec![
            Message::system("be brief"),
            Message::user("first"),
            Message::assistant("reply"),
        ]
    }

    #[test]
    fn multi_turn_backends_get_full_history() {
        let settings = Settings::for_backend(BackendKind::LocalDaemon);
        let request = assemble(
            &history(),
            "second",
            settings,
            Capabilities { multi_turn: true },
        );

        assert_eq!(request.mode(), PromptMode::FullHistory);
        let Payload::History(messages) = request.payload else {
            panic!("expected history payload");
        };
        let roles: Vec<_> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["user", "assistant", "user"]);
        assert_eq!(messages.last().unwrap().content, "second");
    }

    #[test]
    fn single_prompt_backends_get_only_the_new_text() {
        let settings = Settings::for_backend(BackendKind::HostedApi);
        let request = assemble(
            &history(),
            "second",
            settings,
            Capabilities { multi_turn: false },
        );

        assert_eq!(request.mode(), PromptMode::SinglePrompt);
        assert_eq!(request.payload, Payload::Prompt("second".to_string()));
    }

    #[test]
    fn request_carries_settings_snapshot() {
        let mut settings = Settings::for_backend(BackendKind::LocalDaemon);
        settings.set_temperature(Temperature::new(0.3).unwrap());
        let request = assemble(&[], "hi", settings, Capabilities { multi_turn: true });

        assert_eq!(request.model, Model::Llama3);
        assert_eq!(request.temperature.to_string(), "0.3");
    }
}
