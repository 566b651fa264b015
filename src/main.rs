use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

mod app;
mod autostart;
mod chat;
mod cli;
mod config;
mod error;
mod input;
mod lifecycle;
mod logging;
mod models;
mod startup;
mod store;
mod ticker;
mod ui;

use app::App;
use store::TaskStore;

fn main() -> Result<()> {
    // 检查首次运行并加载配置
    let (config, is_first_run) = config::check_first_run()?;
    let data_dir = config::get_data_dir()?;

    // 日志写入文件，终端留给界面
    let _log_guard = logging::init(&data_dir, &config.log_level)?;

    // 处理 CLI 命令
    let should_run_tui = cli::handle_cli(&config)?;

    // 如果 CLI 命令已处理，直接退出
    if !should_run_tui {
        return Ok(());
    }

    let db_path = config.database_path()?;
    let store = TaskStore::open(&db_path)
        .with_context(|| format!("failed to open task database {}", db_path.display()))?;

    let just_booted = startup::detect(
        &data_dir,
        Duration::from_secs(config.boot_window_minutes.saturating_mul(60)),
    );
    tracing::info!(just_booted, first_run = is_first_run, "starting terminal UI");

    // 创建应用
    let mut app = App::new(store, config, is_first_run);
    if just_booted {
        app.show_today_tasks();
    }

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 运行应用
    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "terminal UI exited with error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if !app.handle_key(key) {
                    return Ok(()); // 退出应用
                }
            }
        }
    }
}
