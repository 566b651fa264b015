//! 应用配置管理
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "goalpulse";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据库路径，未设置时使用数据目录下的 tasks.db
    pub database_path: Option<PathBuf>,
    /// 待办计数刷新间隔（秒）
    pub check_interval_secs: u64,
    /// 开机后多久之内视为"刚开机"（分钟）
    pub boot_window_minutes: u64,
    /// 日志级别，可被 GOALPULSE_LOG 覆盖
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            check_interval_secs: 3600,
            boot_window_minutes: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 实际使用的数据库路径
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_data_dir()?.join("tasks.db")),
        }
    }
}

/// 获取配置文件路径
/// macOS: ~/Library/Application Support/goalpulse/config.toml
/// Linux: ~/.config/goalpulse/config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().context("could not determine the home directory")?;
    Ok(dirs.config_dir().join(APP_DIR).join("config.toml"))
}

/// 数据目录：数据库、日志和开机标记都放在这里
pub fn get_data_dir() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().context("could not determine the home directory")?;
    Ok(dirs.data_dir().join(APP_DIR))
}

/// 加载配置
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // 配置文件不存在，返回默认配置
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))?;

    Ok(config)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// 首次运行检查
/// 返回 (config, is_first_run)
pub fn check_first_run() -> Result<(Config, bool)> {
    check_first_run_at(&get_config_path()?)
}

fn check_first_run_at(path: &Path) -> Result<(Config, bool)> {
    if !path.exists() {
        // 首次运行，写入默认配置
        let config = Config::default();
        save_config_to(&config, path)?;
        Ok((config, true))
    } else {
        Ok((load_config_from(path)?, false))
    }
}

/// 更新数据库路径
pub fn set_database_path(path: PathBuf) -> Result<()> {
    let mut config = load_config()?;
    config.database_path = Some(path);
    save_config(&config)?;
    if let Some(path) = &config.database_path {
        println!("✓ Database path set to: {}", path.display());
    }
    Ok(())
}

/// 更新刷新间隔
pub fn set_interval(secs: u64) -> Result<()> {
    anyhow::ensure!(secs > 0, "interval must be at least 1 second");
    let mut config = load_config()?;
    config.check_interval_secs = secs;
    save_config(&config)?;
    println!("✓ Check interval set to: {}s", config.check_interval_secs);
    Ok(())
}

/// 显示当前配置
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("Current configuration:");
    println!("  Database:        {}", config.database_path()?.display());
    println!("  Check interval:  {}s", config.check_interval_secs);
    println!("  Boot window:     {} min", config.boot_window_minutes);
    println!("  Log level:       {}", config.log_level);
    println!();
    println!("Config file: {}", get_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path, None);
        assert_eq!(config.check_interval_secs, 3600);
        assert_eq!(config.boot_window_minutes, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "check_interval_secs = 60\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.check_interval_secs, 60);
        assert_eq!(config.boot_window_minutes, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            database_path: Some(PathBuf::from("/tmp/pulse.db")),
            log_level: "debug".to_string(),
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pulse.db"));
    }

    #[test]
    fn test_first_run_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let (config, first) = check_first_run_at(&path).unwrap();
        assert!(first);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let (_, first) = check_first_run_at(&path).unwrap();
        assert!(!first);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "check_interval_secs = \"soon\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
