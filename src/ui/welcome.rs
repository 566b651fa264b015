use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::dialogs::{centered_rect, render_backdrop};
use crate::app::App;

/// 渲染首次运行欢迎对话框
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    // 渲染半透明背景遮罩
    render_backdrop(f, area);

    // 创建居中的弹窗区域
    let popup_area = centered_rect(70, 60, area);

    // 清空弹窗区域
    f.render_widget(Clear, popup_area);

    // 弹窗外框
    let block = Block::default()
        .title(" 🎉 Welcome to GoalPulse! ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let config_path = crate::config::get_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    let database_path = app
        .store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::DarkGray);

    // 构建欢迎信息内容
    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "Your tasks, greeted every morning.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Config file:", label)]),
        Line::from(vec![Span::styled(config_path, value)]),
        Line::from(""),
        Line::from(vec![Span::styled("Task database:", label)]),
        Line::from(vec![Span::styled(database_path, value)]),
        Line::from(""),
        Line::from(vec![Span::styled("Useful commands:", label)]),
        Line::from(vec![
            Span::styled("  pulse autostart enable", Style::default().fg(Color::Green)),
            Span::styled("   # greet me after login", value),
        ]),
        Line::from(vec![
            Span::styled("  pulse config show", Style::default().fg(Color::Green)),
            Span::styled("        # current settings", value),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ?", Style::default().fg(Color::Yellow)),
            Span::raw("  full help    "),
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw("  add a task"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to start",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, inner);
}
