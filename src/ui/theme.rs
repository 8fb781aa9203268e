use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,
    pub notice_style: Style,

    // Chrome
    pub title_style: Style,
    pub indicator_style: Style,
    pub sidebar_label_style: Style,
    pub gauge_style: Style,
    pub status_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background_color: Color::Rgb(0x14, 0x16, 0x1c),
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),
            notice_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            indicator_style: Style::default().fg(Color::LightBlue),
            sidebar_label_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            gauge_style: Style::default().fg(Color::LightBlue).bg(Color::DarkGray),
            status_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::Rgb(0xfa, 0xfa, 0xfa),
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            notice_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::DarkGray),
            indicator_style: Style::default().fg(Color::Blue),
            sidebar_label_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            gauge_style: Style::default().fg(Color::Blue).bg(Color::Gray),
            status_style: Style::default().fg(Color::Magenta),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
        }
    }

    pub fn for_light(light: bool) -> Self {
        if light {
            Self::light()
        } else {
            Self::dark()
        }
    }
}
