use super::data::{Config, ConfigKey, DEFAULT_SYSTEM_PROMPT};
use super::io::ConfigError;
use crate::core::backend::BackendKind;
use crate::core::settings::{Model, Temperature};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.backend_kind(), BackendKind::LocalDaemon);
    assert_eq!(config.temperature(), Temperature::DEFAULT);
    assert_eq!(config.system_prompt().as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
    assert_eq!(config.log_file(), PathBuf::from("chat_log.txt"));
    assert!(config.log_enabled());
    assert_eq!(config.reveal_delay(), Duration::from_millis(50));
    assert_eq!(config.request_timeout(), None);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set(ConfigKey::Backend, "huggingface").unwrap();
    config
        .set(ConfigKey::DefaultModel, "HuggingFaceH4/zephyr-7b-beta")
        .unwrap();
    config.set(ConfigKey::Temperature, "0.4").unwrap();
    config.set(ConfigKey::LogEnabled, "off").unwrap();
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.backend.as_deref(), Some("hosted"));
    assert_eq!(loaded.backend_kind(), BackendKind::HostedApi);
    assert_eq!(loaded.model_for(BackendKind::HostedApi), Model::Zephyr7bBeta);
    assert_eq!(loaded.temperature().to_string(), "0.4");
    assert!(!loaded.log_enabled());

    let mut loaded = loaded;
    loaded.unset(ConfigKey::Backend);
    loaded.save_to_path(&config_path).unwrap();
    let reloaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(reloaded.backend, None);
    assert_eq!(reloaded.temperature().to_string(), "0.4");
}

#[test]
fn keys_accept_both_spellings() {
    assert_eq!(ConfigKey::parse("log-file"), Some(ConfigKey::LogFile));
    assert_eq!(ConfigKey::parse("LOG_FILE"), Some(ConfigKey::LogFile));
    assert_eq!(ConfigKey::parse("colour"), None);
}

#[test]
fn invalid_values_are_rejected_by_set() {
    let mut config = Config::default();

    let err = config.set(ConfigKey::Temperature, "1.5").unwrap_err();
    assert_eq!(err.key, ConfigKey::Temperature);
    assert!(config.set(ConfigKey::Backend, "openai").is_err());
    assert!(config.set(ConfigKey::Theme, "solarized").is_err());
    assert!(config.set(ConfigKey::MaxNewTokens, "lots").is_err());
    assert!(config.set(ConfigKey::DefaultModel, "gpt-4").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn hand_edited_invalid_values_fail_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "temperature = 3.0\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "backend = [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn model_falls_back_when_it_belongs_to_another_backend() {
    let config = Config {
        default_model: Some("phi3".to_string()),
        ..Default::default()
    };

    assert_eq!(config.model_for(BackendKind::LocalDaemon), Model::Phi3);
    assert_eq!(
        config.model_for(BackendKind::HostedApi),
        Model::default_for(BackendKind::HostedApi)
    );
}

#[test]
fn empty_system_prompt_disables_seeding() {
    let config = Config {
        system_prompt: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(config.system_prompt(), None);
}

#[test]
fn zero_timeout_means_none() {
    let mut config = Config::default();
    config.set(ConfigKey::RequestTimeoutSecs, "0").unwrap();
    assert_eq!(config.request_timeout(), None);
    config.set(ConfigKey::RequestTimeoutSecs, "30").unwrap();
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn light_theme_is_read_case_insensitively() {
    let mut config = Config::default();
    assert!(!config.light_theme());
    config.set(ConfigKey::Theme, "Light").unwrap();
    assert_eq!(config.theme.as_deref(), Some("light"));
    assert!(config.light_theme());
}
