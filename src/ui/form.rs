//! 添加 / 编辑任务表单
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use tui_textarea::{CursorMove, TextArea};

use crate::error::ValidationError;
use crate::models::{parse_due_date, NewTask, Priority, Task, TaskPatch, DATE_FORMAT};

pub const FIELD_LABELS: [&str; 4] = ["Title", "Description", "Due date (YYYY-MM-DD)", "Priority (0-3)"];

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const DUE_DATE: usize = 2;
const PRIORITY: usize = 3;

/// 表单用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit(i64),
}

/// 按键处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Continue,
    Submit,
    Cancel,
}

/// 校验通过的表单内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl FormValues {
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
        }
    }

    /// 编辑时整表写回，未改动的字段也一并提交
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title),
            description: Some(self.description),
            due_date: Some(self.due_date),
            priority: Some(self.priority),
            status: None,
        }
    }
}

/// 校验表单原始文本，通过之后才会写入存储
pub fn parse_form(
    title: &str,
    description: &str,
    due_date: &str,
    priority: &str,
) -> Result<FormValues, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let due_date = parse_due_date(due_date)?;
    let priority = if priority.trim().is_empty() {
        Priority::NORMAL
    } else {
        priority.parse()?
    };

    Ok(FormValues {
        title: title.to_string(),
        description: description.trim().to_string(),
        due_date,
        priority,
    })
}

pub struct TaskForm {
    pub kind: FormKind,
    fields: [TextArea<'static>; 4],
    focus: usize,
    /// 最近一次提交失败的原因，显示在表单底部
    pub error: Option<String>,
}

impl TaskForm {
    /// 新任务表单，截止日期预填今天
    pub fn add(today: NaiveDate) -> Self {
        let due = today.format(DATE_FORMAT).to_string();
        Self::with_values(FormKind::Add, ["", "", due.as_str(), "0"])
    }

    pub fn edit(task: &Task) -> Self {
        let due = task
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let priority = task.priority.to_string();
        Self::with_values(
            FormKind::Edit(task.id),
            [task.title.as_str(), task.description.as_str(), due.as_str(), priority.as_str()],
        )
    }

    fn with_values(kind: FormKind, values: [&str; 4]) -> Self {
        let fields = values.map(single_line);
        let mut form = Self {
            kind,
            fields,
            focus: TITLE,
            error: None,
        };
        form.refresh_styles();
        form
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Add task",
            FormKind::Edit(_) => "Edit task",
        }
    }

    pub fn fields(&self) -> &[TextArea<'static>; 4] {
        &self.fields
    }

    pub fn text(&self, index: usize) -> String {
        self.fields[index].lines().join(" ")
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
        self.refresh_styles();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        self.refresh_styles();
    }

    /// 处理按键：Enter 提交，Esc 取消，Tab / ↑↓ 切换字段，其余交给输入框
    pub fn input(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            // 单行输入框，屏蔽 tui-textarea 的换行快捷键
            KeyCode::Char('m') | KeyCode::Char('j')
                if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            _ => {
                self.fields[self.focus].input(key);
                self.error = None;
            }
        }
        FormEvent::Continue
    }

    pub fn values(&self) -> Result<FormValues, ValidationError> {
        parse_form(
            &self.text(TITLE),
            &self.text(DESCRIPTION),
            &self.text(DUE_DATE),
            &self.text(PRIORITY),
        )
    }

    fn refresh_styles(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            let focused = i == self.focus;
            let border = if focused {
                Color::Rgb(136, 192, 208) // Nord cyan
            } else {
                Color::Rgb(76, 86, 106)
            };
            field.set_block(
                Block::default()
                    .title(format!(" {} ", FIELD_LABELS[i]))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            );
            let cursor = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            field.set_cursor_style(cursor);
        }
    }
}

fn single_line(text: &str) -> TextArea<'static> {
    let mut textarea = TextArea::new(vec![text.to_string()]);
    textarea.set_cursor_line_style(Style::default());
    textarea.move_cursor(CursorMove::End);
    textarea
}
