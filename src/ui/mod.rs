pub mod dialogs;
pub mod form;
pub mod help;
mod statusbar;
mod task_table;
pub mod welcome;

use crate::app::{App, Mode};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// 主渲染函数
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 标题栏
            Constraint::Min(0),    // 任务表
            Constraint::Length(3), // 聊天输入
            Constraint::Length(1), // 状态栏
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    task_table::render(f, chunks[1], app);
    render_chat_line(f, chunks[2], app);
    statusbar::render(f, chunks[3], app);

    // 渲染对话框（如果有）
    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    // 渲染帮助面板（如果处于帮助模式）
    if app.mode == Mode::Help {
        help::render(f, f.area(), &app.chat_registry);
    }

    // 渲染欢迎对话框（如果是首次运行）
    if app.show_welcome_dialog {
        welcome::render(f, f.area(), app);
    }

    // 渲染通知栏（如果有通知）
    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

/// 渲染标题栏
fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            " GoalPulse ",
            Style::default()
                .fg(Color::Rgb(46, 52, 64))
                .bg(Color::Rgb(136, 192, 208))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            app.today.format("%A, %Y-%m-%d").to_string(),
            Style::default().fg(Color::Rgb(216, 222, 233)),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// 渲染聊天输入行
fn render_chat_line(f: &mut Frame, area: Rect, app: &App) {
    let is_active = app.mode == Mode::Chat;
    let border = if is_active { Color::Rgb(136, 192, 208) } else { Color::DarkGray };

    let content = if is_active {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Rgb(136, 192, 208))),
            Span::raw(&app.chat_input),
            Span::styled("█", Style::default().fg(Color::Rgb(136, 192, 208))),
        ])
    } else {
        Line::from(Span::styled(
            "Press / to chat: \"add task\", \"today\", \"help\"...",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let block = Block::default()
        .title(" Chat ")
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);

    f.render_widget(Paragraph::new(content).block(block), area);
}

/// 渲染通知栏
fn render_notification(f: &mut Frame, area: Rect, notification: &crate::app::Notification) {
    use crate::app::NotificationLevel;

    // 通知栏占据顶部 3 行
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.min(3),
    };

    // 根据级别选择颜色
    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(format!(" {} ", prefix), Style::default().fg(fg_color).bg(bg_color).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(&notification.message, Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    let paragraph = Paragraph::new(content).block(block);

    f.render_widget(ratatui::widgets::Clear, notification_area);
    f.render_widget(paragraph, notification_area);
}
