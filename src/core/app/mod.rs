//! Interactive application state: the conversation [`Session`] plus the
//! front-end state around it.
//!
//! Every user-facing control (slash command or keybinding) goes through one
//! of the methods here, so both paths behave identically.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, warn};

use crate::core::export::{default_export_filename, export_to_path};
use crate::core::session::{PendingTurn, Session};
use crate::core::settings::{Model, Temperature};
use crate::ui::theme::Theme;

pub mod ui_state;

pub use ui_state::{PendingView, UiState};

pub struct App {
    pub session: Session,
    pub ui: UiState,
    pub theme: Theme,
    pub reveal_delay: Duration,
}

impl App {
    pub fn new(session: Session, reveal_delay: Duration) -> Self {
        let theme = Theme::for_light(session.settings().light_theme());
        Self {
            session,
            ui: UiState::default(),
            theme,
            reveal_delay,
        }
    }

    /// Starts a turn for `text`. Returns `None` for blank input.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let pending = self.session.begin_turn(text)?;
        self.ui.notice = None;
        self.ui.status = None;
        self.ui.scroll_to_bottom();
        self.ui.start_pending(&pending.user_text, self.reveal_delay);
        Some(pending)
    }

    pub fn complete_turn(&mut self, pending: PendingTurn, reply: String) {
        self.session.complete_turn(pending, reply);
        self.ui.pending = None;
        self.ui.scroll_to_bottom();
    }

    pub fn clear_conversation(&mut self) {
        match self.session.clear() {
            Ok(()) => self.ui.set_status("Conversation cleared"),
            Err(err) => {
                warn!(error = %err, "failed to remove transcript log");
                self.ui
                    .set_status(format!("Conversation cleared, but the log could not be removed: {err}"));
            }
        }
        self.ui.notice = None;
        self.ui.scroll_to_bottom();
    }

    pub fn export_conversation(&mut self, filename: Option<&str>) {
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| default_export_filename(Local::now()));
        let path = PathBuf::from(&filename);

        match export_to_path(self.session.transcript().all(), &path) {
            Ok(_) => self.ui.set_status(format!("Exported: {filename}")),
            Err(err) => {
                debug!(error = %err, "export failed");
                self.ui.set_status(format!("Export error: {err}"));
            }
        }
    }

    pub fn cycle_model(&mut self) -> Model {
        let model = self.session.cycle_model();
        self.ui.set_status(format!("Model: {model}"));
        model
    }

    pub fn select_model(&mut self, name: &str) {
        match self.session.select_model_by_name(name) {
            Ok(model) => self.ui.set_status(format!("Model: {model}")),
            Err(err) => self.ui.set_status(err.to_string()),
        }
    }

    pub fn set_temperature(&mut self, value: &str) {
        let parsed = value
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("Not a number: {value}"))
            .and_then(|raw| Temperature::new(raw).map_err(|err| err.to_string()));

        match parsed {
            Ok(temperature) => {
                self.session.set_temperature(temperature);
                self.ui.set_status(format!("Temperature: {temperature}"));
            }
            Err(message) => self.ui.set_status(message),
        }
    }

    pub fn nudge_temperature(&mut self, up: bool) {
        let temperature = if up {
            self.session.raise_temperature()
        } else {
            self.session.lower_temperature()
        };
        self.ui.set_status(format!("Temperature: {temperature}"));
    }

    pub fn toggle_theme(&mut self) {
        let light = self.session.toggle_theme();
        self.theme = Theme::for_light(light);
        self.ui
            .set_status(if light { "Theme: light" } else { "Theme: dark" });
    }

    pub fn log_status(&self) -> String {
        match self.session.transcript().log() {
            Some(log) => format!("Logging: {}", log.status_string()),
            None => "Logging: disabled".to_string(),
        }
    }

    /// Turns transcript logging on or off. Has no effect when no log file
    /// was configured.
    pub fn set_logging(&mut self, enabled: bool) {
        match self.session.transcript_mut().log_mut() {
            Some(log) => {
                if log.is_active() != enabled {
                    log.toggle();
                }
            }
            None => {
                self.ui.set_status("No log file configured");
                return;
            }
        }
        let status = self.log_status();
        self.ui.set_status(status);
    }
}
