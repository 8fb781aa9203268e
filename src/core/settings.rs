//! Per-session user settings: model, sampling temperature and theme.
//!
//! `Settings` is `Copy`. A turn captures it by value when the request is
//! assembled, so changes made while a call is outstanding only affect the
//! next submission.

use std::error::Error;
use std::fmt;

use crate::core::backend::BackendKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Llama3,
    Llama3_70b,
    Mistral,
    Phi3,
    Mistral7bInstruct,
    Zephyr7bBeta,
    Falcon7bInstruct,
}

const LOCAL_MODELS: &[Model] = &[Model::Llama3, Model::Llama3_70b, Model::Mistral, Model::Phi3];
const HOSTED_MODELS: &[Model] = &[
    Model::Mistral7bInstruct,
    Model::Zephyr7bBeta,
    Model::Falcon7bInstruct,
];

impl Model {
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Llama3 => "llama3",
            Model::Llama3_70b => "llama3-70b",
            Model::Mistral => "mistral",
            Model::Phi3 => "phi3",
            Model::Mistral7bInstruct => "mistralai/Mistral-7B-Instruct-v0.2",
            Model::Zephyr7bBeta => "HuggingFaceH4/zephyr-7b-beta",
            Model::Falcon7bInstruct => "tiiuae/falcon-7b-instruct",
        }
    }

    pub fn backend(self) -> BackendKind {
        if LOCAL_MODELS.contains(&self) {
            BackendKind::LocalDaemon
        } else {
            BackendKind::HostedApi
        }
    }

    pub fn supported_by(kind: BackendKind) -> &'static [Model] {
        match kind {
            BackendKind::LocalDaemon => LOCAL_MODELS,
            BackendKind::HostedApi => HOSTED_MODELS,
        }
    }

    pub fn default_for(kind: BackendKind) -> Model {
        Self::supported_by(kind)[0]
    }

    /// Next model offered by the same backend, wrapping around.
    pub fn next(self) -> Model {
        let models = Self::supported_by(self.backend());
        let index = models.iter().position(|m| *m == self).unwrap_or(0);
        models[(index + 1) % models.len()]
    }

    /// Case-insensitive lookup by identifier.
    pub fn parse(name: &str) -> Result<Model, SettingsError> {
        let name = name.trim();
        LOCAL_MODELS
            .iter()
            .chain(HOSTED_MODELS)
            .copied()
            .find(|model| model.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SettingsError::UnknownModel(name.to_string()))
    }

    /// Like [`Model::parse`], but also requires the model to belong to `kind`.
    pub fn parse_for(name: &str, kind: BackendKind) -> Result<Model, SettingsError> {
        let model = Self::parse(name)?;
        if model.backend() != kind {
            return Err(SettingsError::UnsupportedModel {
                model: model.as_str().to_string(),
                backend: kind,
            });
        }
        Ok(model)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling temperature in [0.1, 1.0], kept in tenths so repeated steps
/// never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: Temperature = Temperature(1);
    pub const MAX: Temperature = Temperature(10);
    pub const DEFAULT: Temperature = Temperature(7);

    /// Rounds to the nearest 0.1 and rejects anything outside the range.
    pub fn new(value: f32) -> Result<Self, SettingsError> {
        if !value.is_finite() {
            return Err(SettingsError::TemperatureOutOfRange(value));
        }
        let tenths = (value * 10.0).round();
        if tenths < Self::MIN.0 as f32 || tenths > Self::MAX.0 as f32 {
            return Err(SettingsError::TemperatureOutOfRange(value));
        }
        Ok(Temperature(tenths as u8))
    }

    pub fn value(self) -> f32 {
        self.0 as f32 / 10.0
    }

    pub fn step_up(self) -> Self {
        Temperature((self.0 + 1).min(Self::MAX.0))
    }

    pub fn step_down(self) -> Self {
        Temperature(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    /// Position in the slider range, 0.0 at the minimum and 1.0 at the maximum.
    pub fn ratio(self) -> f64 {
        (self.0 - Self::MIN.0) as f64 / (Self::MAX.0 - Self::MIN.0) as f64
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    model: Model,
    temperature: Temperature,
    light_theme: bool,
}

impl Settings {
    pub fn new(model: Model, temperature: Temperature, light_theme: bool) -> Self {
        Self {
            model,
            temperature,
            light_theme,
        }
    }

    pub fn for_backend(kind: BackendKind) -> Self {
        Self::new(Model::default_for(kind), Temperature::DEFAULT, false)
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn light_theme(&self) -> bool {
        self.light_theme
    }

    /// Switches model; the replacement must belong to the same backend.
    pub fn set_model(&mut self, model: Model) -> Result<(), SettingsError> {
        if model.backend() != self.model.backend() {
            return Err(SettingsError::UnsupportedModel {
                model: model.as_str().to_string(),
                backend: self.model.backend(),
            });
        }
        self.model = model;
        Ok(())
    }

    pub fn cycle_model(&mut self) -> Model {
        self.model = self.model.next();
        self.model
    }

    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.light_theme = !self.light_theme;
        self.light_theme
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    UnknownModel(String),
    UnsupportedModel { model: String, backend: BackendKind },
    TemperatureOutOfRange(f32),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownModel(name) => write!(f, "Unknown model: {name}"),
            SettingsError::UnsupportedModel { model, backend } => write!(
                f,
                "Model {model} is not served by the {} backend",
                backend.display_name()
            ),
            SettingsError::TemperatureOutOfRange(value) => write!(
                f,
                "Temperature {value} is outside {}..={}",
                Temperature::MIN,
                Temperature::MAX
            ),
        }
    }
}

impl Error for SettingsError {}
