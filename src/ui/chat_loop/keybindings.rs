//! Key handling for the chat loop.
//!
//! Handlers only touch [`App`]; the loop decides what to do with the
//! returned [`KeyOutcome`].

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Submit(String),
}

/// Terminal geometry the scroll keys need.
#[derive(Debug, Clone, Copy)]
pub struct ScrollBounds {
    pub page: u16,
    pub max: u16,
}

pub fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Flattens pasted text to a single input line: newlines and tabs become
/// spaces and other control characters are dropped.
pub fn sanitize_paste(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' | '\r' | '\n' => Some(' '),
            _ if c.is_control() => None,
            _ => Some(c),
        })
        .collect()
}

fn handle_control_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('l') | KeyCode::Char('L') => app.clear_conversation(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.export_conversation(None),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.ui.move_home(),
        KeyCode::Char('u') | KeyCode::Char('U') => {
            app.ui.take_input();
        }
        _ => return false,
    }
    true
}

fn handle_navigation_keys(app: &mut App, code: KeyCode, bounds: ScrollBounds) -> bool {
    match code {
        KeyCode::Up => app.ui.scroll_up(1, bounds.max),
        KeyCode::Down => app.ui.scroll_down(1),
        KeyCode::PageUp => app.ui.scroll_up(bounds.page.max(1), bounds.max),
        KeyCode::PageDown => app.ui.scroll_down(bounds.page.max(1)),
        _ => return false,
    }
    true
}

fn handle_edit_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => app.ui.insert_char(c),
        KeyCode::Backspace => app.ui.backspace(),
        KeyCode::Delete => app.ui.delete(),
        KeyCode::Left => app.ui.move_left(),
        KeyCode::Right => app.ui.move_right(),
        KeyCode::Home => app.ui.move_home(),
        KeyCode::End => app.ui.move_end(),
        _ => return false,
    }
    true
}

fn submit(app: &mut App) -> KeyOutcome {
    let input = app.ui.take_input();
    match process_input(app, &input) {
        CommandResult::Continue => KeyOutcome::Continue,
        CommandResult::ProcessAsMessage(text) if text.trim().is_empty() => KeyOutcome::Continue,
        CommandResult::ProcessAsMessage(text) => KeyOutcome::Submit(text),
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent, bounds: ScrollBounds) -> KeyOutcome {
    if is_quit(&key) {
        return KeyOutcome::Quit;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        handle_control_keys(app, key.code);
        return KeyOutcome::Continue;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        match key.code {
            KeyCode::Up => app.nudge_temperature(true),
            KeyCode::Down => app.nudge_temperature(false),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Enter => submit(app),
        KeyCode::F(2) => {
            app.cycle_model();
            KeyOutcome::Continue
        }
        KeyCode::Esc => {
            app.ui.notice = None;
            app.ui.status = None;
            KeyOutcome::Continue
        }
        code => {
            if !handle_navigation_keys(app, code, bounds) {
                handle_edit_keys(app, code);
            }
            KeyOutcome::Continue
        }
    }
}
