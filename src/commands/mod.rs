mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use crate::core::app::App;
use crate::ui::layout::WELCOME_LINES;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

/// Runs `input` as a slash command when it names one; anything else is
/// handed back to be sent as a chat message.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            (command.handler)(app, CommandInvocation { args })
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    for command in all_commands() {
        text.push_str(&format!("  {:<18} {}\n", command.usage, command.help));
    }
    text.push('\n');
    for line in WELCOME_LINES.iter().skip(2).take_while(|line| !line.is_empty()) {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn usage_status(app: &mut App, usage: &str) -> CommandResult {
    app.ui.set_status(format!("Usage: {usage}"));
    CommandResult::Continue
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.ui.notice = Some(help_text());
    app.ui.scroll_to_bottom();
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.arg().is_some() {
        return usage_status(app, "/clear");
    }
    app.clear_conversation();
    CommandResult::Continue
}

pub(super) fn handle_export(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    app.export_conversation(invocation.arg());
    CommandResult::Continue
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.arg() {
        Some(name) => app.select_model(name),
        None => {
            app.cycle_model();
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_temp(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.arg() {
        Some(value) => app.set_temperature(value),
        None => {
            let current = app.session.settings().temperature();
            app.ui
                .set_status(format!("Temperature: {current} (usage: /temp <0.1-1.0>)"));
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.arg().is_some() {
        return usage_status(app, "/theme");
    }
    app.toggle_theme();
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.arg().map(str::to_ascii_lowercase).as_deref() {
        None => {
            let status = app.log_status();
            app.ui.set_status(status);
        }
        Some("on") => app.set_logging(true),
        Some("off") => app.set_logging(false),
        Some(_) => return usage_status(app, "/log [on|off]"),
    }
    CommandResult::Continue
}

#[cfg(test)]
mod tests;
