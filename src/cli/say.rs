//! TUI-less "say" command

use std::error::Error;
use std::io::Write;

use crate::core::session::Session;

/// Runs one turn and writes the reply. A failed call still prints its
/// marker-prefixed text, matching what the TUI would show.
pub async fn run_say<W: Write>(
    session: &mut Session,
    prompt: &str,
    mut output: W,
) -> Result<(), Box<dyn Error>> {
    let Some(reply) = session.submit(prompt).await else {
        return Err("Usage: duet say <prompt>".into());
    };
    writeln!(output, "{reply}")?;
    Ok(())
}
