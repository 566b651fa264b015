use crate::app::{App, Mode};
use crate::models::{Priority, Task};
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// 渲染待办任务表
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.mode == Mode::Normal;
    let border_style = if is_focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(format!(" Today's tasks ({}) ", app.tasks.len()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border_style)
        .border_type(ratatui::widgets::BorderType::Rounded);

    if app.tasks.is_empty() {
        let paragraph = Paragraph::new("Nothing pending. Press a to add a task.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["ID", "Title", "Due", "Priority", "Status"]).style(
        Style::default()
            .fg(Color::Rgb(129, 161, 193))
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.id.to_string()),
                Cell::from(task.title.as_str()),
                Cell::from(task.due_date_display()),
                Cell::from(priority_span(task.priority)),
                Cell::from(task.status.display()),
            ])
            .style(row_style(task, app.today))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::Rgb(41, 98, 218))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

/// 逾期红色，今天到期黄色
fn row_style(task: &Task, today: NaiveDate) -> Style {
    if task.is_overdue(today) {
        Style::default().fg(Color::Red)
    } else if task.is_due_today(today) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// 优先级指示器
fn priority_span(priority: Priority) -> Span<'static> {
    let color = match priority.value() {
        3 => Color::Red,
        2 => Color::Rgb(208, 135, 112), // Nord orange
        1 => Color::Blue,
        _ => Color::Gray,
    };
    Span::styled(format!("● {}", priority.label()), Style::default().fg(color))
}
