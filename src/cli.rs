use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

use crate::config::Config;
use crate::lifecycle;
use crate::models::{parse_due_date, NewTask, Priority, Task, TaskPatch, TaskStatus, TIMESTAMP_FORMAT};
use crate::store::TaskStore;

/// 处理 CLI 命令
/// 返回 true 表示应该继续进入 TUI，false 表示已处理完毕应该退出
pub fn handle_cli(config: &Config) -> Result<bool> {
    let args: Vec<String> = env::args().collect();

    // 如果没有参数，进入 TUI 模式
    if args.len() < 2 {
        return Ok(true);
    }

    let rest = &args[2..];
    let result = match args[1].as_str() {
        "add" => cmd_add(config, rest),
        "list" => cmd_list(config, rest),
        "today" => cmd_today(config),
        "show" => cmd_show(config, rest),
        "count" => cmd_count(config),
        "update" => cmd_update(config, rest),
        "done" => cmd_done(config, rest),
        "delete" => cmd_delete(config, rest),
        "config" => handle_config_command(rest),
        "autostart" => handle_autostart_command(rest),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "-v" => {
            print_version();
            Ok(())
        }
        cmd => Err(anyhow!("Unknown command: {}\nRun 'pulse --help' for usage", cmd)),
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "cli command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(false)
}

fn open_store(config: &Config) -> Result<TaskStore> {
    let path = config.database_path()?;
    TaskStore::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

// ============================================================================
// Argument helpers
// ============================================================================

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|s| s == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|s| s == flag)
}

/// 第一个 `--` 参数之前的所有词，用空格拼接
fn leading_words(args: &[String]) -> String {
    args.iter()
        .take_while(|s| !s.starts_with("--"))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_id(args: &[String], usage: &str) -> Result<i64> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow!("Missing task ID\nUsage: {}", usage))?;
    raw.parse()
        .map_err(|_| anyhow!("Invalid task ID '{}' (must be a number)", raw))
}

fn parse_add_args(args: &[String]) -> Result<NewTask> {
    let title = leading_words(args);
    if title.trim().is_empty() {
        bail!("Missing task title\nUsage: pulse add <title> [--description D] [--due YYYY-MM-DD] [--priority 0-3]");
    }

    let mut task = NewTask::new(title.trim());
    if let Some(description) = parse_flag(args, "--description") {
        task = task.description(description);
    }
    if let Some(due) = parse_flag(args, "--due") {
        if let Some(date) = parse_due_date(&due)? {
            task = task.due(date);
        }
    }
    if let Some(priority) = parse_flag(args, "--priority") {
        task = task.priority(priority.parse::<Priority>()?);
    }
    Ok(task)
}

fn parse_update_args(args: &[String]) -> Result<(i64, TaskPatch)> {
    let id = parse_id(
        args,
        "pulse update <id> [--title T] [--description D] [--due DATE|none] [--priority P] [--status S]",
    )?;
    let flags = &args[1..];

    let mut patch = TaskPatch {
        title: parse_flag(flags, "--title"),
        description: parse_flag(flags, "--description"),
        ..TaskPatch::default()
    };
    if let Some(due) = parse_flag(flags, "--due") {
        patch.due_date = Some(if due.eq_ignore_ascii_case("none") {
            None
        } else {
            parse_due_date(&due)?
        });
    }
    if let Some(priority) = parse_flag(flags, "--priority") {
        patch.priority = Some(priority.parse()?);
    }
    if let Some(status) = parse_flag(flags, "--status") {
        patch.status = Some(status.parse::<TaskStatus>()?);
    }

    if patch.is_empty() {
        bail!(
            "Nothing to update\nMutable fields: {}",
            lifecycle::mutable_fields().join(", ")
        );
    }
    Ok((id, patch))
}

// ============================================================================
// Task Commands
// ============================================================================

fn cmd_add(config: &Config, args: &[String]) -> Result<()> {
    let task = parse_add_args(args)?;
    let store = open_store(config)?;
    let id = store.create(&task)?;
    println!("✓ Added task #{}: {}", id, task.title);
    Ok(())
}

fn cmd_list(config: &Config, args: &[String]) -> Result<()> {
    let store = open_store(config)?;
    let tasks = if has_flag(args, "--all") {
        store.list_all()?
    } else {
        store.list_pending_ordered()?
    };

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    print_task_table(&tasks);
    Ok(())
}

fn cmd_today(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let tasks = store.list_pending_ordered()?;

    if tasks.is_empty() {
        println!("No pending tasks today. Enjoy a relaxed day!");
        return Ok(());
    }

    println!("Today's pending tasks:\n");
    for (i, task) in tasks.iter().enumerate() {
        println!("{}. {} ({})", i + 1, task.title, task.priority.label());
    }
    Ok(())
}

fn cmd_show(config: &Config, args: &[String]) -> Result<()> {
    let id = parse_id(args, "pulse show <id>")?;
    let store = open_store(config)?;
    let task = store
        .get(id)?
        .ok_or_else(|| anyhow!("Task {} not found", id))?;

    println!("Task #{}", task.id);
    println!("Title: {}", task.title);
    println!("Status: {}", task.status.display());
    println!("Priority: {} ({})", task.priority.label(), task.priority);
    println!("Due: {}", task.due_date_display());
    println!("Created: {}", task.created_at.format(TIMESTAMP_FORMAT));
    if let Some(completed) = task.completed_at {
        println!("Completed: {}", completed.format(TIMESTAMP_FORMAT));
    }
    if !task.description.is_empty() {
        println!("\nDescription:");
        println!("{}", task.description);
    }
    Ok(())
}

fn cmd_count(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    println!("{}", store.count_pending()?);
    Ok(())
}

fn cmd_update(config: &Config, args: &[String]) -> Result<()> {
    let (id, patch) = parse_update_args(args)?;
    let store = open_store(config)?;
    if !store.update(id, &patch)? {
        bail!("Task {} not found", id);
    }
    println!("✓ Updated task #{}", id);
    Ok(())
}

fn cmd_done(config: &Config, args: &[String]) -> Result<()> {
    let id = parse_id(args, "pulse done <id>")?;
    let store = open_store(config)?;
    let (completed, message) = lifecycle::complete(&store, id)?;
    if !completed {
        bail!("Task {} not found or already completed", id);
    }
    println!("✓ Completed task #{}", id);
    println!("  {}", message);
    Ok(())
}

fn cmd_delete(config: &Config, args: &[String]) -> Result<()> {
    let id = parse_id(args, "pulse delete <id>")?;
    let store = open_store(config)?;
    if !store.delete(id)? {
        bail!("Task {} not found", id);
    }
    println!("✓ Deleted task #{}", id);
    Ok(())
}

fn print_task_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    println!("ID    PRIORITY   DUE          STATUS   TITLE");
    println!("----  ---------  -----------  -------  ------------------------------------");

    for task in tasks {
        println!(
            "{:<4}  {:<9}  {:<11}  {:<7}  {}",
            task.id,
            task.priority.label(),
            task.due_date_display(),
            task.status.display(),
            truncate(&task.title, 48)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Config / Autostart Commands
// ============================================================================

fn handle_config_command(args: &[String]) -> Result<()> {
    match args.first().map(|s| s.as_str()) {
        None | Some("show") => crate::config::show_config(),
        Some("db") => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow!("Missing path\nUsage: pulse config db <path>"))?;
            crate::config::set_database_path(PathBuf::from(path))
        }
        Some("interval") => {
            let secs = args
                .get(1)
                .ok_or_else(|| anyhow!("Missing seconds\nUsage: pulse config interval <secs>"))?;
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow!("Invalid interval '{}' (must be a number of seconds)", secs))?;
            crate::config::set_interval(secs)
        }
        Some(other) => Err(anyhow!(
            "Unknown config option: {}\nAvailable options: show, db, interval",
            other
        )),
    }
}

fn handle_autostart_command(args: &[String]) -> Result<()> {
    match args.first().map(|s| s.as_str()) {
        Some("enable") => {
            let exe = env::current_exe().context("could not locate the pulse executable")?;
            let path = crate::autostart::enable(&exe)?;
            println!("✓ Autostart enabled: {}", path.display());
            Ok(())
        }
        Some("disable") => {
            if crate::autostart::disable()? {
                println!("✓ Autostart disabled");
            } else {
                println!("No autostart entry found");
            }
            Ok(())
        }
        _ => Err(anyhow!("Usage: pulse autostart enable|disable")),
    }
}

/// 打印帮助信息
fn print_help() {
    println!("GoalPulse (pulse) - to-do reminder for your terminal\n");
    println!("USAGE:");
    println!("  pulse                   Launch the interactive UI");
    println!("  pulse <command> [args]  Run a command and exit\n");

    println!("TASK COMMANDS:");
    println!("  add <title> [--description D] [--due YYYY-MM-DD] [--priority 0-3]");
    println!("  list [--all] [--json]   List pending tasks (--all includes completed)");
    println!("  today                   Show today's pending tasks");
    println!("  show <id>               Show one task");
    println!("  count                   Print the number of pending tasks");
    println!("  update <id> [--title T] [--description D] [--due DATE|none]");
    println!("              [--priority P] [--status pending|completed]");
    println!("  done <id>               Mark a task completed");
    println!("  delete <id>             Delete a task permanently\n");

    println!("SETTINGS:");
    println!("  config [show]           Show the current configuration");
    println!("  config db <path>        Use another task database");
    println!("  config interval <secs>  Pending-count refresh interval");
    println!("  autostart enable        Launch at login");
    println!("  autostart disable       Stop launching at login\n");

    println!("PRIORITIES:");
    println!("  0 normal, 1 medium, 2 important, 3 urgent\n");

    println!("EXAMPLES:");
    println!("  pulse add \"Pay rent\" --due 2025-06-02 --priority 3");
    println!("  pulse list --json");
    println!("  pulse done 2\n");

    println!("Set GOALPULSE_LOG=debug for verbose logs.");
}

/// 打印版本信息
fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    println!("{} {}", NAME, VERSION);
}
