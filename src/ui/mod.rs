//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that dispatches input to
//!   [`crate::commands`] and waits on the backend one turn at a time.
//! - [`renderer`] and [`layout`]: view composition and frame output.
//! - [`theme`]: dark and light palettes.
//! - [`reveal`]: word-by-word display of the outstanding turn.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the conversation.

pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod reveal;
pub mod theme;
