use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self) -> Option<&'a str> {
        Some(self.args.trim()).filter(|args| !args.is_empty())
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands and keybindings.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the conversation and delete the transcript log.",
        handler: super::handle_clear,
    },
    Command {
        name: "export",
        usage: "/export [file]",
        help: "Export the conversation to a text file.",
        handler: super::handle_export,
    },
    Command {
        name: "model",
        usage: "/model [name]",
        help: "Switch model, or cycle to the next one.",
        handler: super::handle_model,
    },
    Command {
        name: "temp",
        usage: "/temp <0.1-1.0>",
        help: "Set the sampling temperature.",
        handler: super::handle_temp,
    },
    Command {
        name: "theme",
        usage: "/theme",
        help: "Toggle between the light and dark theme.",
        handler: super::handle_theme,
    },
    Command {
        name: "log",
        usage: "/log [on|off]",
        help: "Show transcript logging status, or turn it on or off.",
        handler: super::handle_log,
    },
];
