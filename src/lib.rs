//! Duet is a terminal chat front-end for a local Ollama daemon or a hosted
//! text-generation API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation (transcript, settings, session), prompt
//!   assembly, the two inference backends, config and export.
//! - [`ui`] renders the terminal interface and runs the sequential event loop.
//! - [`commands`] implements slash-command parsing and dispatch.
//! - [`api`] defines the wire payloads of both backends.
//! - [`auth`] resolves and stores the hosted API token.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
