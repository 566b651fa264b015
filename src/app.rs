use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::chat::{ChatIntent, ChatRegistry, DEFAULT_REPLY};
use crate::config::Config;
use crate::error::TaskError;
use crate::lifecycle;
use crate::models::{Priority, Task, TaskPatch};
use crate::store::TaskStore;
use crate::ticker::Ticker;
use crate::ui::dialogs::{ConfirmAction, DialogType};
use crate::ui::form::{FormKind, TaskForm};

/// 通知显示时长
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// 存储出错时给用户看的提示，细节只写日志
const GENERIC_ERROR: &str = "Something went wrong, please try again.";

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// 检查通知是否已过期（3秒后自动消失）
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= NOTIFICATION_TTL
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和快捷键
    Normal,
    /// 对话框模式
    Dialog,
    /// 聊天输入模式
    Chat,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 应用状态
pub struct App {
    pub store: TaskStore,
    pub config: Config,
    /// 待办任务（显示顺序），只是存储内容的快照
    pub tasks: Vec<Task>,
    /// 选中的行
    pub selected: usize,
    pub mode: Mode,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    pub notification: Option<Notification>,
    /// 聊天输入缓冲
    pub chat_input: String,
    pub chat_registry: ChatRegistry,
    /// 状态栏上的待办计数，由定时器刷新
    pub pending_count: usize,
    pub ticker: Ticker,
    /// 是否显示首次运行欢迎对话框
    pub show_welcome_dialog: bool,
    pub should_quit: bool,
    pub today: NaiveDate,
}

impl App {
    pub fn new(store: TaskStore, config: Config, is_first_run: bool) -> Self {
        let interval = Duration::from_secs(config.check_interval_secs);
        let mut app = Self {
            store,
            config,
            tasks: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            dialog: None,
            notification: None,
            chat_input: String::new(),
            chat_registry: ChatRegistry::new(),
            pending_count: 0,
            ticker: Ticker::new(interval, Instant::now()),
            show_welcome_dialog: is_first_run,
            should_quit: false,
            today: chrono::Local::now().date_naive(),
        };
        app.refresh();
        app
    }

    /// 处理键盘输入，返回 false 表示应该退出应用
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key);
        !self.should_quit
    }

    /// 从存储重新读取任务列表和计数
    pub fn refresh(&mut self) {
        self.today = chrono::Local::now().date_naive();
        let result = self
            .store
            .list_pending_ordered()
            .and_then(|tasks| Ok((tasks, self.store.count_pending()?)));
        match result {
            Ok((tasks, count)) => {
                self.tasks = tasks;
                self.pending_count = count;
                self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// 事件循环每次迭代调用
    pub fn on_tick(&mut self, now: Instant) {
        self.clear_expired_notification(now);

        if self.ticker.poll(now) {
            match self.store.count_pending() {
                Ok(count) => {
                    self.pending_count = count;
                    info!(pending = count, "periodic pending check");
                }
                Err(e) => self.report_error(&e),
            }
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = (self.selected + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_dialog(&mut self, dialog: DialogType) {
        self.dialog = Some(dialog);
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    pub fn open_add_form(&mut self) {
        self.open_dialog(DialogType::Form(TaskForm::add(self.today)));
    }

    pub fn open_edit_form(&mut self) {
        match self.selected_task() {
            Some(task) => {
                let form = TaskForm::edit(task);
                self.open_dialog(DialogType::Form(form));
            }
            None => self.notify_no_selection(),
        }
    }

    /// 提交表单。校验失败时表单保持打开并显示原因，不会访问存储
    pub fn submit_form(&mut self) {
        let Some(DialogType::Form(form)) = &mut self.dialog else {
            return;
        };

        let values = match form.values() {
            Ok(values) => values,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let kind = form.kind;

        let result = match kind {
            FormKind::Add => self
                .store
                .create(&values.into_new_task())
                .map(|_| "Task added"),
            FormKind::Edit(id) => self
                .store
                .update(id, &values.into_patch())
                .map(|found| if found { "Task updated" } else { "Task no longer exists" }),
        };

        self.close_dialog();
        match result {
            Ok(message) => {
                self.show_notification(message.to_string(), NotificationLevel::Success);
                self.refresh();
            }
            Err(e) => self.report_error(&e),
        }
    }

    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            self.notify_no_selection();
            return;
        };

        match lifecycle::complete(&self.store, id) {
            Ok((true, message)) => {
                self.show_notification(message, NotificationLevel::Success);
                self.refresh();
            }
            Ok((false, _)) => {
                self.show_notification(
                    "Task is already completed or gone".to_string(),
                    NotificationLevel::Warning,
                );
                self.refresh();
            }
            Err(e) => self.report_error(&e),
        }
    }

    pub fn request_delete(&mut self) {
        let Some(task) = self.selected_task() else {
            self.notify_no_selection();
            return;
        };
        let dialog = DialogType::confirm(
            "Delete task",
            format!("Delete \"{}\"? This cannot be undone.", task.title),
            ConfirmAction::DeleteTask(task.id),
        );
        self.open_dialog(dialog);
    }

    pub fn set_selected_priority(&mut self, priority: Priority) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            self.notify_no_selection();
            return;
        };
        let patch = TaskPatch {
            priority: Some(priority),
            ..TaskPatch::default()
        };
        match self.store.update(id, &patch) {
            Ok(true) => {
                self.show_notification(
                    format!("Priority set to {}", priority.label()),
                    NotificationLevel::Info,
                );
                self.refresh();
                // 排序变化后继续选中同一个任务
                if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
                    self.selected = pos;
                }
            }
            Ok(false) => {
                self.show_notification(
                    "Task no longer exists".to_string(),
                    NotificationLevel::Warning,
                );
                self.refresh();
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// 今日任务提醒：列出全部待办任务
    pub fn show_today_tasks(&mut self) {
        self.refresh();
        let lines = if self.tasks.is_empty() {
            vec!["No pending tasks today. Enjoy a relaxed day!".to_string()]
        } else {
            let mut lines = vec!["Today's pending tasks:".to_string(), String::new()];
            lines.extend(
                self.tasks
                    .iter()
                    .enumerate()
                    .map(|(i, t)| format!("{}. {} ({})", i + 1, t.title, t.priority.label())),
            );
            lines
        };
        self.open_dialog(DialogType::message("Today's tasks", lines));
    }

    /// 退出前检查：还有待办任务时先确认
    pub fn request_quit(&mut self) {
        let pending = match self.store.count_pending() {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "pending check before quit failed");
                0
            }
        };
        if pending == 0 {
            self.should_quit = true;
            return;
        }
        self.open_dialog(DialogType::confirm(
            "Unfinished tasks",
            format!("You still have {pending} pending task(s). Quit anyway?"),
            ConfirmAction::Quit,
        ));
    }

    /// 执行已确认的操作
    pub fn confirm(&mut self, action: ConfirmAction) {
        self.close_dialog();
        match action {
            ConfirmAction::Quit => self.should_quit = true,
            ConfirmAction::DeleteTask(id) => match self.store.delete(id) {
                Ok(true) => {
                    self.show_notification("Task deleted".to_string(), NotificationLevel::Success);
                    self.refresh();
                }
                Ok(false) => {
                    self.show_notification(
                        "Task no longer exists".to_string(),
                        NotificationLevel::Warning,
                    );
                    self.refresh();
                }
                Err(e) => self.report_error(&e),
            },
        }
    }

    pub fn enter_chat(&mut self) {
        self.chat_input.clear();
        self.mode = Mode::Chat;
    }

    /// 处理聊天消息。空白消息直接忽略
    pub fn handle_chat_message(&mut self, message: &str) {
        let Some(intent) = self.chat_registry.dispatch(message) else {
            return;
        };
        info!(?intent, "chat message dispatched");

        match intent {
            ChatIntent::AddTask => self.open_add_form(),
            ChatIntent::CompleteTask => self.complete_selected(),
            ChatIntent::DeleteTask => self.request_delete(),
            ChatIntent::Refresh => {
                self.refresh();
                self.show_notification("Task list refreshed".to_string(), NotificationLevel::Info);
            }
            ChatIntent::ShowToday => self.show_today_tasks(),
            ChatIntent::Help => self.mode = Mode::Help,
            ChatIntent::Unknown => {
                self.open_dialog(DialogType::message("GoalPulse", vec![DEFAULT_REPLY.to_string()]))
            }
        }
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    fn notify_no_selection(&mut self) {
        self.show_notification("No task selected".to_string(), NotificationLevel::Warning);
    }

    /// 校验错误原样提示；存储错误只给通用提示，细节写日志
    fn report_error(&mut self, e: &TaskError) {
        if e.is_validation() {
            self.show_notification(e.to_string(), NotificationLevel::Warning);
        } else {
            error!(error = %e, "task store operation failed");
            self.show_notification(GENERIC_ERROR.to_string(), NotificationLevel::Error);
        }
    }
}
