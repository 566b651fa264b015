use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::form::TaskForm;

/// 确认操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(i64),
    Quit,
}

/// 对话框类型
pub enum DialogType {
    /// 添加 / 编辑任务表单
    Form(TaskForm),
    /// 确认对话框
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
    /// 只读消息（今日任务、聊天回复）
    Message { title: String, lines: Vec<String> },
}

impl DialogType {
    pub fn confirm(title: impl Into<String>, message: impl Into<String>, action: ConfirmAction) -> Self {
        DialogType::Confirm {
            title: title.into(),
            message: message.into(),
            yes_selected: false,
            action,
        }
    }

    pub fn message(title: impl Into<String>, lines: Vec<String>) -> Self {
        DialogType::Message {
            title: title.into(),
            lines,
        }
    }
}

/// 渲染居中的对话框
pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    // 渲染半透明背景遮罩
    render_backdrop(f, f.area());

    let area = match dialog {
        DialogType::Form(_) => centered_rect(60, 70, f.area()),
        DialogType::Confirm { .. } => centered_rect(50, 30, f.area()),
        DialogType::Message { .. } => centered_rect(60, 60, f.area()),
    };

    // 清空对话框区域
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Form(form) => render_form_dialog(f, area, form),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
        DialogType::Message { title, lines } => render_message_dialog(f, area, title, lines),
    }
}

/// 渲染半透明背景遮罩
pub(crate) fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0))); // 黑色背景
    f.render_widget(block, area);
}

fn dialog_block(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64))) // Nord background
}

/// 渲染任务表单
fn render_form_dialog(f: &mut Frame, area: Rect, form: &TaskForm) {
    let block = dialog_block(form.title(), Color::Rgb(76, 86, 106)); // Nord border color
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 描述
            Constraint::Length(3), // 截止日期
            Constraint::Length(3), // 优先级
            Constraint::Min(1),    // 错误信息
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    for (i, field) in form.fields().iter().enumerate() {
        f.render_widget(field, chunks[i]);
    }

    if let Some(error) = &form.error {
        let error_text = Paragraph::new(format!("✗ {}", error))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Rgb(191, 97, 106))); // Nord red
        f.render_widget(error_text, chunks[4]);
    }

    let help = Paragraph::new("Tab/↑↓ switch field  Enter save  Esc cancel")
        .style(Style::default().fg(Color::Rgb(129, 161, 193))) // Nord frost color
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[5]);
}

/// 渲染确认对话框
fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
) {
    let block = dialog_block(title, Color::Rgb(235, 203, 139)); // Nord yellow for warnings
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 消息
            Constraint::Length(3), // 按钮
        ])
        .split(inner);

    // 消息文本
    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(216, 222, 233))); // Nord snow storm
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    // 否按钮 (n) - 放在左侧
    let no_style = if !yes_selected {
        Style::default()
            .bg(Color::Rgb(191, 97, 106))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(191, 97, 106))
            .add_modifier(Modifier::DIM)
    };
    let no_button = Paragraph::new("[ n ] No")
        .style(no_style)
        .alignment(Alignment::Center);
    f.render_widget(no_button, button_chunks[1]);

    // 是按钮 (y) - 放在右侧
    let yes_style = if yes_selected {
        Style::default()
            .bg(Color::Rgb(163, 190, 140))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(163, 190, 140))
            .add_modifier(Modifier::DIM)
    };
    let yes_button = Paragraph::new("[ y ] Yes")
        .style(yes_style)
        .alignment(Alignment::Center);
    f.render_widget(yes_button, button_chunks[2]);
}

/// 渲染消息对话框
fn render_message_dialog(f: &mut Frame, area: Rect, title: &str, lines: &[String]) {
    let block = dialog_block(title, Color::Rgb(136, 192, 208)); // Nord cyan
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut text: Vec<Line> = vec![Line::from("")];
    text.extend(lines.iter().map(|l| Line::from(format!("  {}", l))));

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));
    f.render_widget(body, chunks[0]);

    let help = Paragraph::new("Enter / Esc close")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

/// 创建一个居中的矩形区域
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
