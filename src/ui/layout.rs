//! Turns application state into the flattened, pre-wrapped line stream the
//! transcript pane draws. Scroll math and rendering both consume this output,
//! so no further wrapping happens after it.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::App;
use crate::core::backend::hosted::WARMING_UP_MESSAGE;
use crate::core::backend::ERROR_MARKER;
use crate::core::message::{Message, Role};
use crate::ui::theme::Theme;

pub const SIDEBAR_WIDTH: u16 = 30;
const INPUT_HEIGHT: u16 = 3;

pub const WELCOME_LINES: &[&str] = &[
    "Welcome! Type a message below and press Enter to chat.",
    "",
    "Controls:",
    "  Enter            send message",
    "  F2               next model",
    "  Alt+Up/Alt+Down  temperature +/- 0.1",
    "  Ctrl+T           toggle light/dark theme",
    "  Ctrl+L           clear conversation and log",
    "  Ctrl+E           export conversation",
    "  PgUp/PgDn        scroll",
    "  Ctrl+C           quit",
    "",
    "Type /help to list slash commands.",
];

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub sidebar: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

impl ScreenAreas {
    pub fn compute(area: Rect) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(columns[1]);

        Self {
            sidebar: columns[0],
            transcript: rows[0],
            input: rows[1],
            status: rows[2],
        }
    }

    /// Rows available for transcript text (the first row holds the title).
    pub fn transcript_text_height(&self) -> u16 {
        self.transcript.height.saturating_sub(1)
    }
}

fn is_failure_reply(content: &str) -> bool {
    content.starts_with(ERROR_MARKER) || content == WARMING_UP_MESSAGE
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    role: Role,
    content: &str,
    theme: &Theme,
) {
    let (prefix, prefix_style, text_style) = match role {
        Role::User => ("You: ", theme.user_prefix_style, theme.user_text_style),
        Role::Assistant if is_failure_reply(content) => (
            "Assistant: ",
            theme.assistant_prefix_style,
            theme.error_text_style,
        ),
        Role::Assistant => (
            "Assistant: ",
            theme.assistant_prefix_style,
            theme.assistant_text_style,
        ),
        Role::System => ("System: ", theme.notice_style, theme.notice_style),
    };

    let mut content_lines = content.split('\n');
    let first = content_lines.next().unwrap_or_default();
    lines.push(Line::from(vec![
        Span::styled(prefix, prefix_style),
        Span::styled(first.to_string(), text_style),
    ]));
    for rest in content_lines {
        lines.push(Line::from(Span::styled(rest.to_string(), text_style)));
    }
    lines.push(Line::from(""));
}

/// Pulsing glyph shown while a reply is outstanding.
pub fn indicator_symbol(elapsed_ms: u128) -> &'static str {
    let phase = (elapsed_ms % 1000) as f32 / 500.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

/// Every transcript line for the current state, before wrapping.
pub fn build_transcript_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    if app.session.is_first_visit() && app.session.transcript().is_empty() {
        for text in WELCOME_LINES {
            lines.push(Line::from(Span::styled(*text, theme.notice_style)));
        }
    }

    let visible: &[Message] = app.session.transcript().visible();
    let pending = app.ui.pending.as_ref();
    for (index, message) in visible.iter().enumerate() {
        let is_outstanding = pending.is_some() && index + 1 == visible.len();
        match (is_outstanding, pending) {
            (true, Some(view)) => {
                push_message_lines(&mut lines, message.role, &view.reveal.text(), theme)
            }
            _ => push_message_lines(&mut lines, message.role, &message.content, theme),
        }
    }

    if let Some(view) = pending {
        let symbol = indicator_symbol(view.started.elapsed().as_millis());
        lines.push(Line::from(vec![
            Span::styled("Assistant: ", theme.assistant_prefix_style),
            Span::styled(format!("{symbol} thinking..."), theme.indicator_style),
        ]));
    }

    if let Some(notice) = &app.ui.notice {
        for text in notice.lines() {
            lines.push(Line::from(Span::styled(text.to_string(), theme.notice_style)));
        }
    }

    lines
}

/// Greedy word wrap that keeps span styles. Words wider than `width` are
/// broken between characters.
pub fn prewrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    if width == 0 {
        return lines.to_vec();
    }

    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let mut wrapper = LineWrapper::new(width);
        for span in &line.spans {
            for piece in split_keep_whitespace(&span.content) {
                wrapper.push(piece, span.style);
            }
        }
        out.extend(wrapper.finish());
    }
    out
}

fn split_keep_whitespace(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (index, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|previous| previous != space) {
            pieces.push(&text[start..index]);
            start = index;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

struct LineWrapper {
    width: usize,
    rows: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    used: usize,
}

impl LineWrapper {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            current: Vec::new(),
            used: 0,
        }
    }

    fn append(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.used += text.width();
        if let Some(last) = self.current.last_mut() {
            if last.style == style {
                let mut combined = last.content.to_string();
                combined.push_str(text);
                *last = Span::styled(combined, style);
                return;
            }
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn break_row(&mut self) {
        self.rows.push(Line::from(std::mem::take(&mut self.current)));
        self.used = 0;
    }

    fn push(&mut self, piece: &str, style: Style) {
        let piece_width = piece.width();

        if piece.chars().all(char::is_whitespace) {
            if self.used == 0 && !self.rows.is_empty() {
                return;
            }
            if self.used + piece_width <= self.width {
                self.append(piece, style);
            } else {
                self.break_row();
            }
            return;
        }

        if self.used + piece_width <= self.width {
            self.append(piece, style);
            return;
        }
        if self.used > 0 && piece_width <= self.width {
            self.break_row();
            self.append(piece, style);
            return;
        }

        let mut buffer = [0u8; 4];
        for ch in piece.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if self.used + ch_width > self.width && self.used > 0 {
                self.break_row();
            }
            self.append(ch.encode_utf8(&mut buffer), style);
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.rows.push(Line::from(self.current));
        self.rows
    }
}

/// Largest useful scroll distance from the bottom.
pub fn max_scroll(total_lines: usize, visible_height: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    total.saturating_sub(visible_height)
}

/// Wrapped transcript lines and the top offset to draw them from.
pub fn transcript_view(app: &App, area: Rect) -> (Vec<Line<'static>>, u16) {
    let lines = prewrap_lines(&build_transcript_lines(app), area.width);
    let height = area.height.saturating_sub(1);
    let max = max_scroll(lines.len(), height);
    let offset = max - app.ui.scroll_from_bottom.min(max);
    (lines, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::tests::test_app;
    use crate::core::backend::BackendKind;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn wrapping_breaks_at_word_boundaries() {
        let lines = vec![Line::from("the quick brown fox")];
        let wrapped = prewrap_lines(&lines, 10);
        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, ["the quick ", "brown fox"]);
    }

    #[test]
    fn long_words_are_split() {
        let lines = vec![Line::from("abcdefghij")];
        let texts: Vec<String> = prewrap_lines(&lines, 4).iter().map(text_of).collect();
        assert_eq!(texts, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_lines_survive_wrapping() {
        let lines = vec![Line::from(""), Line::from("x")];
        assert_eq!(prewrap_lines(&lines, 5).len(), 2);
    }

    #[test]
    fn welcome_banner_only_on_first_visit() {
        let mut app = test_app(BackendKind::LocalDaemon, &[]);
        let before: Vec<String> = build_transcript_lines(&app).iter().map(text_of).collect();
        assert_eq!(before[0], WELCOME_LINES[0]);

        let pending = app.begin_turn("hello").unwrap();
        app.complete_turn(pending, "hi".to_string());
        let after: Vec<String> = build_transcript_lines(&app).iter().map(text_of).collect();
        assert_eq!(after, ["You: hello", "", "Assistant: hi", ""]);
    }

    #[test]
    fn outstanding_turn_shows_reveal_and_indicator() {
        let mut app = test_app(BackendKind::LocalDaemon, &[]);
        app.begin_turn("one two three").unwrap();

        let lines: Vec<String> = build_transcript_lines(&app).iter().map(text_of).collect();
        assert_eq!(lines[0], "You: one");
        assert!(lines.last().unwrap().contains("thinking..."));
    }

    #[test]
    fn scroll_offset_counts_from_the_bottom() {
        assert_eq!(max_scroll(50, 20), 30);
        assert_eq!(max_scroll(5, 20), 0);
    }

    #[test]
    fn indicator_cycles() {
        assert_eq!(indicator_symbol(0), "○");
        assert_eq!(indicator_symbol(500), "●");
    }
}
