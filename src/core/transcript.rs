//! Ordered, append-only conversation history for one session.

use std::io;

use chrono::{DateTime, Local};
use tracing::warn;

use crate::core::message::Message;
use crate::utils::logging::ChatLog;

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    system_prompt: Option<String>,
    log: Option<ChatLog>,
}

impl Transcript {
    /// Creates a transcript seeded with `system_prompt` when one is given.
    pub fn new(system_prompt: Option<String>) -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            system_prompt: system_prompt.filter(|prompt| !prompt.trim().is_empty()),
            log: None,
        };
        transcript.seed();
        transcript
    }

    pub fn with_log(mut self, log: ChatLog) -> Self {
        self.log = Some(log);
        self
    }

    fn seed(&mut self) {
        if let Some(prompt) = &self.system_prompt {
            self.messages.push(Message::system(prompt.clone()));
        }
    }

    /// Appends to the end. System messages are only accepted as the very
    /// first entry; a late one is dropped so the preamble stays in front.
    pub fn append(&mut self, message: Message) {
        if message.is_system() && !self.messages.is_empty() {
            warn!("ignoring system message appended after conversation start");
            return;
        }
        self.messages.push(message);
    }

    /// Resets to the seeded state and deletes the mirrored log file.
    pub fn clear(&mut self) -> io::Result<()> {
        self.messages.clear();
        self.seed();
        if let Some(log) = &self.log {
            log.remove()?;
        }
        Ok(())
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Everything after the system preamble, in order. This is what gets
    /// rendered and what a multi-turn backend receives as history.
    pub fn visible(&self) -> &[Message] {
        match self.messages.first() {
            Some(first) if first.is_system() => &self.messages[1..],
            _ => &self.messages,
        }
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.visible().is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn log(&self) -> Option<&ChatLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut ChatLog> {
        self.log.as_mut()
    }

    /// Writes one completed turn to the mirrored log, if any.
    pub fn mirror_turn(&self, user: &str, assistant: &str, at: DateTime<Local>) -> io::Result<()> {
        match &self.log {
            Some(log) => log.append_turn(user, assistant, at),
            None => Ok(()),
        }
    }
}
