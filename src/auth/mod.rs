//! Bearer credential for the hosted inference API.
//!
//! Lookup order is the `HF_API_TOKEN` environment variable, then the system
//! keyring. A missing token is not an error.

use std::env;
use std::io::{self, BufRead, Write};

use keyring::Entry;
use tracing::{debug, warn};

use crate::core::keyring::KeyringAccessError;

pub const TOKEN_ENV_VAR: &str = "HF_API_TOKEN";
const KEYRING_SERVICE: &str = "duet";
const KEYRING_USER: &str = "hosted-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keyring,
}

pub struct CredentialStore {
    use_keyring: bool,
    env_var: &'static str,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            use_keyring: true,
            env_var: TOKEN_ENV_VAR,
        }
    }

    /// A store that never touches the system keyring (useful for tests).
    pub fn without_keyring() -> Self {
        Self {
            use_keyring: false,
            env_var: TOKEN_ENV_VAR,
        }
    }

    #[cfg(test)]
    fn with_env_var(mut self, env_var: &'static str) -> Self {
        self.env_var = env_var;
        self
    }

    fn entry() -> Result<Entry, KeyringAccessError> {
        Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(KeyringAccessError::from)
    }

    fn env_token(&self) -> Option<String> {
        env::var(self.env_var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    pub fn token(&self) -> Result<Option<(String, TokenSource)>, KeyringAccessError> {
        if let Some(token) = self.env_token() {
            debug!(source = "environment", "resolved hosted api token");
            return Ok(Some((token, TokenSource::Environment)));
        }
        if !self.use_keyring {
            return Ok(None);
        }

        match Self::entry()?.get_password() {
            Ok(token) => {
                debug!(source = "keyring", "resolved hosted api token");
                Ok(Some((token, TokenSource::Keyring)))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(KeyringAccessError::from(err)),
        }
    }

    /// Like [`CredentialStore::token`], but keyring trouble only produces a
    /// warning.
    pub fn token_or_none(&self) -> Option<String> {
        match self.token() {
            Ok(found) => found.map(|(token, _)| token),
            Err(err) => {
                warn!(error = %err, recoverable = err.is_recoverable(), "keyring lookup failed");
                None
            }
        }
    }

    pub fn store(&self, token: &str) -> Result<(), KeyringAccessError> {
        if !self.use_keyring {
            return Ok(());
        }
        Self::entry()?
            .set_password(token)
            .map_err(KeyringAccessError::from)
    }

    /// Returns whether a stored token was removed.
    pub fn remove(&self) -> Result<bool, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(false);
        }
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(KeyringAccessError::from(err)),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `duet auth`: reads a token from `input` and stores it.
pub fn run_auth<R: BufRead, W: Write>(
    store: &CredentialStore,
    mut input: R,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>> {
    write!(output, "Enter your hosted API token: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let token = line.trim();
    if token.is_empty() {
        return Err("No token entered.".into());
    }

    store.store(token)?;
    writeln!(output, "Token saved to the system keyring.")?;
    Ok(())
}

/// `duet deauth`: removes the stored token.
pub fn run_deauth<W: Write>(
    store: &CredentialStore,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>> {
    if store.remove()? {
        writeln!(output, "Removed the stored hosted API token.")?;
    } else {
        writeln!(output, "No stored hosted API token found.")?;
    }
    if env::var_os(TOKEN_ENV_VAR).is_some() {
        writeln!(output, "Note: {TOKEN_ENV_VAR} is still set in the environment.")?;
    }
    Ok(())
}

pub fn run_auth_stdio(store: &CredentialStore) -> Result<(), Box<dyn std::error::Error>> {
    run_auth(store, io::stdin().lock(), io::stdout())
}
