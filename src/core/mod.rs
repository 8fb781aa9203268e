pub mod app;
pub mod backend;
pub mod config;
pub mod export;
pub mod keyring;
pub mod message;
pub mod prompt;
pub mod session;
pub mod settings;
pub mod transcript;
