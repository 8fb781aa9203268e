use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::backend::BackendKind;
use crate::core::settings::{Model, Temperature};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, friendly assistant.";
pub const DEFAULT_LOG_FILE: &str = "chat_log.txt";
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 50;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// "local" or "hosted"
    pub backend: Option<String>,
    pub local_url: Option<String>,
    pub hosted_url: Option<String>,
    pub default_model: Option<String>,
    pub temperature: Option<f32>,
    /// "dark" or "light"
    pub theme: Option<String>,
    /// Seeded as the first, hidden message. An empty string disables it.
    pub system_prompt: Option<String>,
    pub log_file: Option<String>,
    pub log_enabled: Option<bool>,
    /// Hosted API only.
    pub max_new_tokens: Option<u32>,
    pub reveal_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Keys understood by `duet set` / `duet unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Backend,
    LocalUrl,
    HostedUrl,
    DefaultModel,
    Temperature,
    Theme,
    SystemPrompt,
    LogFile,
    LogEnabled,
    MaxNewTokens,
    RevealDelayMs,
    RequestTimeoutSecs,
}

impl ConfigKey {
    pub const ALL: &'static [ConfigKey] = &[
        ConfigKey::Backend,
        ConfigKey::LocalUrl,
        ConfigKey::HostedUrl,
        ConfigKey::DefaultModel,
        ConfigKey::Temperature,
        ConfigKey::Theme,
        ConfigKey::SystemPrompt,
        ConfigKey::LogFile,
        ConfigKey::LogEnabled,
        ConfigKey::MaxNewTokens,
        ConfigKey::RevealDelayMs,
        ConfigKey::RequestTimeoutSecs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Backend => "backend",
            ConfigKey::LocalUrl => "local-url",
            ConfigKey::HostedUrl => "hosted-url",
            ConfigKey::DefaultModel => "default-model",
            ConfigKey::Temperature => "temperature",
            ConfigKey::Theme => "theme",
            ConfigKey::SystemPrompt => "system-prompt",
            ConfigKey::LogFile => "log-file",
            ConfigKey::LogEnabled => "log-enabled",
            ConfigKey::MaxNewTokens => "max-new-tokens",
            ConfigKey::RevealDelayMs => "reveal-delay-ms",
            ConfigKey::RequestTimeoutSecs => "request-timeout-secs",
        }
    }

    /// Accepts both the kebab-case CLI spelling and the snake_case file
    /// spelling.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that does not fit its key.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidValue {
    pub key: ConfigKey,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for {}: {}",
            self.value, self.key, self.reason
        )
    }
}

impl std::error::Error for InvalidValue {}

fn invalid(key: ConfigKey, value: &str, reason: impl fmt::Display) -> InvalidValue {
    InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> Result<bool, InvalidValue> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected on or off")),
    }
}

fn parse_number<T: std::str::FromStr>(key: ConfigKey, value: &str) -> Result<T, InvalidValue>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|err| invalid(key, value, err))
}

impl Config {
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), InvalidValue> {
        match key {
            ConfigKey::Backend => {
                let kind = BackendKind::parse(value)
                    .ok_or_else(|| invalid(key, value, "expected local or hosted"))?;
                self.backend = Some(kind.as_str().to_string());
            }
            ConfigKey::LocalUrl => self.local_url = Some(value.trim().to_string()),
            ConfigKey::HostedUrl => self.hosted_url = Some(value.trim().to_string()),
            ConfigKey::DefaultModel => {
                let model = Model::parse(value).map_err(|err| invalid(key, value, err))?;
                self.default_model = Some(model.as_str().to_string());
            }
            ConfigKey::Temperature => {
                let raw: f32 = parse_number(key, value)?;
                let temperature = Temperature::new(raw).map_err(|err| invalid(key, value, err))?;
                self.temperature = Some(temperature.value());
            }
            ConfigKey::Theme => match value.trim().to_ascii_lowercase().as_str() {
                theme @ ("dark" | "light") => self.theme = Some(theme.to_string()),
                _ => return Err(invalid(key, value, "expected dark or light")),
            },
            ConfigKey::SystemPrompt => self.system_prompt = Some(value.to_string()),
            ConfigKey::LogFile => self.log_file = Some(value.trim().to_string()),
            ConfigKey::LogEnabled => self.log_enabled = Some(parse_bool(key, value)?),
            ConfigKey::MaxNewTokens => self.max_new_tokens = Some(parse_number(key, value)?),
            ConfigKey::RevealDelayMs => self.reveal_delay_ms = Some(parse_number(key, value)?),
            ConfigKey::RequestTimeoutSecs => {
                self.request_timeout_secs = Some(parse_number(key, value)?)
            }
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Backend => self.backend = None,
            ConfigKey::LocalUrl => self.local_url = None,
            ConfigKey::HostedUrl => self.hosted_url = None,
            ConfigKey::DefaultModel => self.default_model = None,
            ConfigKey::Temperature => self.temperature = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::SystemPrompt => self.system_prompt = None,
            ConfigKey::LogFile => self.log_file = None,
            ConfigKey::LogEnabled => self.log_enabled = None,
            ConfigKey::MaxNewTokens => self.max_new_tokens = None,
            ConfigKey::RevealDelayMs => self.reveal_delay_ms = None,
            ConfigKey::RequestTimeoutSecs => self.request_timeout_secs = None,
        }
    }

    /// Checks values that may have been hand-edited into the file.
    pub fn validate(&self) -> Result<(), InvalidValue> {
        if let Some(backend) = &self.backend {
            if BackendKind::parse(backend).is_none() {
                return Err(invalid(ConfigKey::Backend, backend, "expected local or hosted"));
            }
        }
        if let Some(model) = &self.default_model {
            Model::parse(model).map_err(|err| invalid(ConfigKey::DefaultModel, model, err))?;
        }
        if let Some(temperature) = self.temperature {
            Temperature::new(temperature).map_err(|err| {
                invalid(ConfigKey::Temperature, &temperature.to_string(), err)
            })?;
        }
        if let Some(theme) = &self.theme {
            if !matches!(theme.to_ascii_lowercase().as_str(), "dark" | "light") {
                return Err(invalid(ConfigKey::Theme, theme, "expected dark or light"));
            }
        }
        Ok(())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend
            .as_deref()
            .and_then(BackendKind::parse)
            .unwrap_or(BackendKind::LocalDaemon)
    }

    /// The configured model when it belongs to `kind`, else that backend's
    /// default.
    pub fn model_for(&self, kind: BackendKind) -> Model {
        self.default_model
            .as_deref()
            .and_then(|name| Model::parse_for(name, kind).ok())
            .unwrap_or_else(|| Model::default_for(kind))
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
            .and_then(|value| Temperature::new(value).ok())
            .unwrap_or_default()
    }

    pub fn light_theme(&self) -> bool {
        self.theme
            .as_deref()
            .is_some_and(|theme| theme.eq_ignore_ascii_case("light"))
    }

    pub fn system_prompt(&self) -> Option<String> {
        match &self.system_prompt {
            Some(prompt) if prompt.trim().is_empty() => None,
            Some(prompt) => Some(prompt.clone()),
            None => Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        PathBuf::from(self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE))
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled.unwrap_or(true)
    }

    pub fn base_url_for(&self, kind: BackendKind) -> Option<String> {
        match kind {
            BackendKind::LocalDaemon => self.local_url.clone(),
            BackendKind::HostedApi => self.hosted_url.clone(),
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms.unwrap_or(DEFAULT_REVEAL_DELAY_MS))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// The stored value for `key`, if any, formatted for display.
    pub fn display_value(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Backend => self.backend.clone(),
            ConfigKey::LocalUrl => self.local_url.clone(),
            ConfigKey::HostedUrl => self.hosted_url.clone(),
            ConfigKey::DefaultModel => self.default_model.clone(),
            ConfigKey::Temperature => self.temperature.map(|t| format!("{t:.1}")),
            ConfigKey::Theme => self.theme.clone(),
            ConfigKey::SystemPrompt => self.system_prompt.clone(),
            ConfigKey::LogFile => self.log_file.clone(),
            ConfigKey::LogEnabled => self
                .log_enabled
                .map(|on| if on { "on" } else { "off" }.to_string()),
            ConfigKey::MaxNewTokens => self.max_new_tokens.map(|n| n.to_string()),
            ConfigKey::RevealDelayMs => self.reveal_delay_ms.map(|n| n.to_string()),
            ConfigKey::RequestTimeoutSecs => self.request_timeout_secs.map(|n| n.to_string()),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
