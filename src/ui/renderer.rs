use crate::core::app::App;
use crate::core::settings::Model;
use crate::ui::layout::{transcript_view, ScreenAreas};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const INPUT_TITLE: &str = "Message (Enter to send, /help for commands, Ctrl+C to quit)";
const PENDING_INPUT_TITLE: &str = "Waiting for reply... (Ctrl+C to quit)";

/// Draws one frame. Reads application state only.
pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let areas = ScreenAreas::compute(f.area());
    render_sidebar(f, app, areas.sidebar);
    render_transcript(f, app, areas.transcript);
    render_input(f, app, areas.input);

    let status = app.ui.status.clone().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Span::styled(status, theme.status_style)),
        areas.status,
    );
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let settings = app.session.settings();
    let title = format!(
        "Duet v{} • {} • {}",
        env!("CARGO_PKG_VERSION"),
        app.session.backend_kind().display_name(),
        settings.model()
    );

    let (lines, offset) = transcript_view(app, area);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(Span::styled(title, app.theme.title_style)))
        .scroll((offset, 0));
    f.render_widget(paragraph, area);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let settings = app.session.settings();
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme.input_border_style)
        .title(Span::styled("Settings", theme.title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let backend = app.session.backend_kind();
    let mut model_lines = vec![Line::from(Span::styled("Model", theme.sidebar_label_style))];
    for model in Model::supported_by(backend) {
        let marker = if *model == settings.model() { "▸ " } else { "  " };
        let style = if *model == settings.model() {
            theme.user_text_style
        } else {
            theme.notice_style
        };
        model_lines.push(Line::from(Span::styled(format!("{marker}{model}"), style)));
    }
    f.render_widget(Paragraph::new(model_lines), rows[0]);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Creativeness {}", settings.temperature()),
            theme.sidebar_label_style,
        )),
        rows[1],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(theme.gauge_style)
            .ratio(settings.temperature().ratio())
            .label(""),
        rows[2],
    );

    let log_line = match app.session.transcript().log() {
        Some(log) => log.status_string(),
        None => "disabled".to_string(),
    };
    let details = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Backend ", theme.sidebar_label_style),
            Span::styled(backend.as_str(), theme.notice_style),
        ]),
        Line::from(vec![
            Span::styled("Theme   ", theme.sidebar_label_style),
            Span::styled(
                if settings.light_theme() { "light" } else { "dark" },
                theme.notice_style,
            ),
        ]),
        Line::from(vec![
            Span::styled("Log     ", theme.sidebar_label_style),
            Span::styled(log_line, theme.notice_style),
        ]),
    ];
    f.render_widget(Paragraph::new(details), rows[3]);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let pending = app.ui.is_pending();
    let title = if pending { PENDING_INPUT_TITLE } else { INPUT_TITLE };

    let inner_width = area.width.saturating_sub(2) as usize;
    let before_cursor: String = app.ui.input.chars().take(app.ui.cursor).collect();
    let cursor_column = before_cursor.width();
    let skip = cursor_column.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(app.ui.input.as_str())
        .style(theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style)
                .title(Span::styled(title, theme.input_title_style)),
        )
        .scroll((0, skip as u16));
    f.render_widget(input, area);

    if !pending {
        let x = area.x + 1 + (cursor_column - skip) as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}
