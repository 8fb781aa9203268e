//! One interactive conversation: transcript, settings and the backend they
//! are sent to.
//!
//! A submission is split in two halves so a front end can animate between
//! them: [`Session::begin_turn`] records the user message and captures the
//! request, [`Session::complete_turn`] records whatever the backend said.
//! Every begun turn must be completed, which keeps the transcript strictly
//! alternating.

use std::io;
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::core::backend::{Backend, BackendKind};
use crate::core::message::Message;
use crate::core::prompt::{assemble, BackendRequest};
use crate::core::settings::{Model, Settings, SettingsError, Temperature};
use crate::core::transcript::Transcript;

pub struct Session {
    transcript: Transcript,
    settings: Settings,
    first_visit: bool,
    backend: Arc<dyn Backend>,
}

/// A turn whose user message is recorded but whose reply is outstanding.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub user_text: String,
    pub request: BackendRequest,
}

impl Session {
    pub fn new(transcript: Transcript, settings: Settings, backend: Arc<dyn Backend>) -> Self {
        Self {
            transcript,
            settings,
            first_visit: true,
            backend,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn is_first_visit(&self) -> bool {
        self.first_visit
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Records the user message and freezes the request for this turn.
    /// Blank input is ignored and returns `None`.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let request = assemble(
            self.transcript.visible(),
            text,
            self.settings,
            self.backend.capabilities(),
        );
        self.transcript.append(Message::user(text));
        self.first_visit = false;
        debug!(
            model = %request.model,
            temperature = %request.temperature,
            mode = ?request.mode(),
            "turn started"
        );

        Some(PendingTurn {
            user_text: text.to_string(),
            request,
        })
    }

    /// Records the reply for `pending` and mirrors the turn to the log.
    pub fn complete_turn(&mut self, pending: PendingTurn, reply: String) {
        let now = Local::now();
        self.transcript
            .append(Message::assistant(reply.as_str()).with_timestamp(now));
        if let Err(err) = self.transcript.mirror_turn(&pending.user_text, &reply, now) {
            warn!(error = %err, "failed to append turn to transcript log");
        }
    }

    /// Runs a whole turn against the backend without any animation.
    pub async fn submit(&mut self, text: &str) -> Option<String> {
        let pending = self.begin_turn(text)?;
        let reply = self.backend.call(&pending.request).await;
        self.complete_turn(pending, reply.clone());
        Some(reply)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        debug!("clearing conversation");
        self.transcript.clear()
    }

    pub fn select_model_by_name(&mut self, name: &str) -> Result<Model, SettingsError> {
        let model = Model::parse_for(name, self.backend_kind())?;
        self.settings.set_model(model)?;
        Ok(model)
    }

    pub fn cycle_model(&mut self) -> Model {
        self.settings.cycle_model()
    }

    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.settings.set_temperature(temperature);
    }

    pub fn raise_temperature(&mut self) -> Temperature {
        let next = self.settings.temperature().step_up();
        self.settings.set_temperature(next);
        next
    }

    pub fn lower_temperature(&mut self) -> Temperature {
        let next = self.settings.temperature().step_down();
        self.settings.set_temperature(next);
        next
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.settings.toggle_theme()
    }
}
