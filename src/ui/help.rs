use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::dialogs::{centered_rect, render_backdrop};
use crate::chat::ChatRegistry;

fn heading(text: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )])
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(action),
    ])
}

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect, registry: &ChatRegistry) {
    // 渲染半透明背景遮罩
    render_backdrop(f, area);

    // 创建居中的弹窗区域
    let popup_area = centered_rect(80, 75, area);

    // 清空弹窗区域
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keyboard help (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    // 分成两列
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    // 左列：导航和任务操作
    let task_help = vec![
        heading("Navigation"),
        Line::from(""),
        binding("j, ↓", "Next task"),
        binding("k, ↑", "Previous task"),
        binding("r", "Reload list"),
        binding("t", "Today's tasks"),
        binding("q", "Quit"),
        Line::from(""),
        heading("Tasks"),
        Line::from(""),
        binding("a", "Add task"),
        binding("e, Enter", "Edit task"),
        binding("c, Space", "Mark done"),
        binding("d", "Delete task"),
        binding("0-3", "Set priority"),
    ];

    // 右列：聊天关键词来自注册表
    let mut chat_help = vec![heading("Chat (/)"), Line::from("")];
    for def in registry.entries() {
        if let Some(keyword) = def.keywords.first() {
            chat_help.push(binding(keyword, def.description));
        }
    }
    chat_help.extend([
        Line::from("Chinese keywords work too: 添加任务, 完成任务 ..."),
        Line::from(""),
        heading("Dialogs"),
        Line::from(""),
        binding("Tab", "Next field"),
        binding("Enter", "Save / confirm"),
        binding("y / n", "Answer a confirmation"),
        binding("Esc", "Cancel"),
    ]);

    let left = Paragraph::new(task_help)
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });

    let right = Paragraph::new(chat_help).wrap(Wrap { trim: false });

    f.render_widget(left, columns[0]);
    f.render_widget(right, columns[1]);
}
