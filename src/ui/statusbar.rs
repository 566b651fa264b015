use crate::app::{App, Mode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 渲染状态栏（Helix 风格）
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Dialog => ("DIALOG", Color::Magenta),
        Mode::Chat => ("CHAT", Color::Yellow),
        Mode::Help => ("HELP", Color::Blue),
    };

    let hints = match app.mode {
        Mode::Normal => "a add  e edit  c done  d delete  0-3 priority  t today  / chat  ? help  q quit",
        Mode::Chat => "Enter send  Esc cancel",
        Mode::Dialog | Mode::Help => "Esc close",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {} pending | ", app.pending_count)),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
