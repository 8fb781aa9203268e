//! Command-line interface parsing and handling
//!
//! Parses arguments, resolves settings from flags over the config file, and
//! dispatches to the TUI or one of the non-interactive subcommands.

pub mod say;

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::auth::{run_auth_stdio, run_deauth, CredentialStore};
use crate::core::app::App;
use crate::core::backend::{build_backend, hosted, BackendKind, BackendOptions};
use crate::core::config::{Config, ConfigKey};
use crate::core::session::Session;
use crate::core::settings::{Model, Settings, SettingsError, Temperature};
use crate::core::transcript::Transcript;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics;
use crate::utils::logging::ChatLog;

#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(version)]
#[command(about = "A terminal chat front-end for a local Ollama daemon or a hosted inference API")]
#[command(
    long_about = "Duet is a full-screen terminal chat interface. It talks to a local Ollama \
daemon (multi-turn) or to a hosted text-generation API (single prompt per turn).\n\n\
Authentication:\n\
  The hosted API token is read from HF_API_TOKEN, then from the system keyring.\n\
  Use 'duet auth' to store a token and 'duet deauth' to remove it.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Up/Down/PgUp/PgDn Scroll through chat history\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+E            Export the conversation\n\
  Ctrl+T            Toggle light/dark theme\n\
  F2                Next model\n\
  Alt+Up/Alt+Down   Raise/lower temperature\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help             Show commands and keys\n\
  /export [file]    Export the conversation\n\
  /log [on|off]     Show or change transcript logging"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend to talk to: local or hosted
    #[arg(short = 'b', long, global = true, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Model to use; must be served by the selected backend
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature between 0.1 and 1.0
    #[arg(short = 't', long, global = true, value_parser = parse_temperature)]
    pub temperature: Option<Temperature>,

    /// Append the transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Do not write the transcript log
    #[arg(long, global = true, conflicts_with = "log")]
    pub no_log: bool,

    /// Start with the light theme
    #[arg(long, global = true)]
    pub light: bool,

    /// Write diagnostics to this file (filter with DUET_LOG)
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one prompt and print the reply
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the models served by the selected backend
    Models,
    /// Store a hosted API token in the system keyring
    Auth,
    /// Remove the stored hosted API token
    Deauth,
    /// Set a configuration value, or show all values when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

fn parse_backend(value: &str) -> Result<BackendKind, String> {
    BackendKind::parse(value).ok_or_else(|| format!("unknown backend '{value}' (use local or hosted)"))
}

fn parse_temperature(value: &str) -> Result<Temperature, String> {
    let parsed: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Temperature::new(parsed).map_err(|err| err.to_string())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    diagnostics::init(args.debug_log.as_deref())?;

    match &args.command {
        None | Some(Commands::Chat) => {
            let config = Config::load()?;
            let session = build_session(&args, &config)?;
            let app = App::new(session, config.reveal_delay());
            run_chat(app).await
        }
        Some(Commands::Say { prompt }) => {
            let config = Config::load()?;
            let mut session = build_session(&args, &config)?;
            say::run_say(&mut session, &prompt.join(" "), io::stdout()).await
        }
        Some(Commands::Models) => {
            let config = Config::load()?;
            let settings = resolve_settings(&args, &config)?;
            list_models(settings.model(), io::stdout())
        }
        Some(Commands::Auth) => run_auth_stdio(&CredentialStore::new()),
        Some(Commands::Deauth) => run_deauth(&CredentialStore::new(), io::stdout()),
        Some(Commands::Set { key, value }) => {
            let path = Config::config_path()?;
            match key {
                Some(key) => set_value(&path, key, &value.join(" "), io::stdout()),
                None => {
                    Config::load_from_path(&path)?.print_all();
                    Ok(())
                }
            }
        }
        Some(Commands::Unset { key }) => unset_value(&Config::config_path()?, key, io::stdout()),
    }
}

/// Flags win over the config file; a `--model` that the backend does not
/// serve is an error rather than a silent fallback.
pub fn resolve_settings(args: &Args, config: &Config) -> Result<Settings, SettingsError> {
    let kind = args.backend.unwrap_or_else(|| config.backend_kind());
    let model = match args.model.as_deref() {
        Some(name) => Model::parse_for(name, kind)?,
        None => config.model_for(kind),
    };
    let temperature = args.temperature.unwrap_or_else(|| config.temperature());
    Ok(Settings::new(
        model,
        temperature,
        args.light || config.light_theme(),
    ))
}

/// The transcript log is written unless `--no-log` is given or the config
/// disables it; `--log` both picks the file and turns logging on.
pub fn build_transcript(args: &Args, config: &Config) -> Transcript {
    let path = args.log.clone().unwrap_or_else(|| config.log_file());
    let enabled = !args.no_log && (args.log.is_some() || config.log_enabled());
    let log = if enabled {
        ChatLog::new(path)
    } else {
        ChatLog::paused(path)
    };
    Transcript::new(config.system_prompt()).with_log(log)
}

fn backend_options(kind: BackendKind, config: &Config, store: &CredentialStore) -> BackendOptions {
    let mut options = BackendOptions::new(kind);
    options.base_url = config.base_url_for(kind);
    options.timeout = config.request_timeout();
    if kind == BackendKind::HostedApi {
        options.token = store.token_or_none();
        options.max_new_tokens = config
            .max_new_tokens
            .unwrap_or(hosted::DEFAULT_MAX_NEW_TOKENS);
    }
    options
}

pub fn build_session(args: &Args, config: &Config) -> Result<Session, Box<dyn Error>> {
    let settings = resolve_settings(args, config)?;
    let kind = settings.model().backend();
    let backend = build_backend(backend_options(kind, config, &CredentialStore::new()))?;
    debug!(backend = %kind, model = settings.model().as_str(), "session ready");
    Ok(Session::new(build_transcript(args, config), settings, backend))
}

pub fn list_models<W: Write>(selected: Model, mut output: W) -> Result<(), Box<dyn Error>> {
    let kind = selected.backend();
    writeln!(output, "Models served by {}:", kind.display_name())?;
    for model in Model::supported_by(kind) {
        let marker = if *model == selected { "*" } else { " " };
        writeln!(output, "  {marker} {}", model.as_str())?;
    }
    Ok(())
}

fn parse_key(name: &str) -> Result<ConfigKey, Box<dyn Error>> {
    ConfigKey::parse(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
        format!("Unknown config key: {name} (known keys: {})", known.join(", ")).into()
    })
}

pub fn set_value<W: Write>(
    path: &Path,
    key: &str,
    value: &str,
    mut output: W,
) -> Result<(), Box<dyn Error>> {
    let key = parse_key(key)?;
    if value.trim().is_empty() {
        return Err(format!("Missing value. Example: duet set {key} <value>").into());
    }
    let mut config = Config::load_from_path(path)?;
    config.set(key, value)?;
    config.save_to_path(path)?;
    writeln!(output, "✅ Set {key} to: {}", value.trim())?;
    Ok(())
}

pub fn unset_value<W: Write>(path: &Path, key: &str, mut output: W) -> Result<(), Box<dyn Error>> {
    let key = parse_key(key)?;
    let mut config = Config::load_from_path(path)?;
    config.unset(key);
    config.save_to_path(path)?;
    writeln!(output, "✅ Unset {key}")?;
    Ok(())
}
