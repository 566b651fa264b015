use crate::app::{App, Mode};
use crate::input::Command;
use crate::models::Priority;
use crate::ui::dialogs::DialogType;
use crate::ui::form::FormEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 处理键盘输入
pub fn handle_key_input(app: &mut App, key: KeyEvent) {
    // Windows 上松开按键也会产生事件
    if key.kind == KeyEventKind::Release {
        return;
    }

    // 如果显示欢迎对话框，任意按键都关闭它
    if app.show_welcome_dialog {
        app.show_welcome_dialog = false;
        return;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Chat => handle_chat_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// 处理正常模式的按键
fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if let Some(cmd) = match_key(key) {
        execute_command(app, cmd);
    }
}

/// 匹配按键到命令
pub fn match_key(key: KeyEvent) -> Option<Command> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Char('q'), _) => Some(Command::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Command::TaskDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Command::TaskUp),

        (KeyCode::Char('a'), _) => Some(Command::NewTask),
        (KeyCode::Char('e'), _) | (KeyCode::Enter, _) => Some(Command::EditTask),
        (KeyCode::Char('c'), _) | (KeyCode::Char(' '), _) => Some(Command::CompleteTask),
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => Some(Command::DeleteTask),
        (KeyCode::Char(c @ '0'..='3'), _) => {
            Priority::new(i64::from(c as u8 - b'0')).ok().map(Command::SetPriority)
        }

        (KeyCode::Char('r'), _) => Some(Command::Refresh),
        (KeyCode::Char('t'), _) => Some(Command::ShowToday),
        (KeyCode::Char('/'), _) => Some(Command::EnterChatMode),
        (KeyCode::Char('?'), _) => Some(Command::ShowHelp),

        _ => None,
    }
}

/// 执行命令
fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => app.request_quit(),
        Command::TaskDown => app.select_next(),
        Command::TaskUp => app.select_prev(),
        Command::NewTask => app.open_add_form(),
        Command::EditTask => app.open_edit_form(),
        Command::CompleteTask => app.complete_selected(),
        Command::DeleteTask => app.request_delete(),
        Command::SetPriority(priority) => app.set_selected_priority(priority),
        Command::Refresh => {
            app.refresh();
            app.show_notification(
                "Task list refreshed".to_string(),
                crate::app::NotificationLevel::Info,
            );
        }
        Command::ShowToday => app.show_today_tasks(),
        Command::EnterChatMode => app.enter_chat(),
        Command::ShowHelp => app.mode = Mode::Help,
    }
}

/// 处理对话框模式的按键
fn handle_dialog_mode(app: &mut App, key: KeyEvent) {
    if app.dialog.is_none() {
        app.mode = Mode::Normal;
        return;
    }
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };

    match dialog {
        DialogType::Form(form) => match form.input(key) {
            FormEvent::Submit => app.submit_form(),
            FormEvent::Cancel => app.close_dialog(),
            FormEvent::Continue => {}
        },
        DialogType::Confirm {
            yes_selected,
            action,
            ..
        } => {
            let action = *action;
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(action),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                    *yes_selected = !*yes_selected;
                }
                KeyCode::Enter => {
                    if *yes_selected {
                        app.confirm(action);
                    } else {
                        app.close_dialog();
                    }
                }
                _ => {}
            }
        }
        DialogType::Message { .. } => {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ')
            ) {
                app.close_dialog();
            }
        }
    }
}

/// 处理聊天输入模式的按键
fn handle_chat_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.chat_input.clear();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            let message = std::mem::take(&mut app.chat_input);
            app.mode = Mode::Normal;
            app.handle_chat_message(&message);
        }
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Char(c) => {
            app.chat_input.push(c);
        }
        _ => {}
    }
}

/// 处理帮助模式的按键
fn handle_help_mode(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.mode = Mode::Normal;
    }
}
