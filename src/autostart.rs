//! Login-item registration.
//!
//! Linux uses an XDG autostart entry, macOS a LaunchAgent with `RunAtLoad`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub const DESKTOP_FILE: &str = "goalpulse.desktop";
pub const LAUNCH_AGENT_LABEL: &str = "com.goalpulse.app";

#[derive(Debug, Error)]
pub enum AutostartError {
    #[error("autostart is not supported on {0}")]
    Unsupported(&'static str),

    #[error("could not determine the home directory")]
    NoHome,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Register `exe` to start at login. Returns the entry path.
pub fn enable(exe: &Path) -> Result<PathBuf, AutostartError> {
    let path = entry_path()?;
    let content = entry_content(exe)?;
    write_entry(&path, &content)?;
    info!(path = %path.display(), exe = %exe.display(), "autostart enabled");
    Ok(path)
}

/// Remove the login entry. `Ok(false)` if there was none.
pub fn disable() -> Result<bool, AutostartError> {
    let path = entry_path()?;
    remove_entry(&path)
}

fn entry_path() -> Result<PathBuf, AutostartError> {
    let dirs = directories::BaseDirs::new().ok_or(AutostartError::NoHome)?;
    match std::env::consts::OS {
        "linux" => Ok(dirs.config_dir().join("autostart").join(DESKTOP_FILE)),
        "macos" => Ok(dirs
            .home_dir()
            .join("Library")
            .join("LaunchAgents")
            .join(format!("{LAUNCH_AGENT_LABEL}.plist"))),
        other => Err(AutostartError::Unsupported(other)),
    }
}

fn entry_content(exe: &Path) -> Result<String, AutostartError> {
    match std::env::consts::OS {
        "linux" => Ok(desktop_entry(exe)),
        "macos" => Ok(launch_agent_plist(exe)),
        other => Err(AutostartError::Unsupported(other)),
    }
}

/// XDG autostart entry launching `exe`.
pub fn desktop_entry(exe: &Path) -> String {
    let exe = exe.to_string_lossy();
    let exec = if exe.contains(char::is_whitespace) {
        format!("\"{}\"", exe.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        exe.into_owned()
    };
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=GoalPulse\n\
         Comment=Show today's pending tasks after login\n\
         Exec={exec}\n\
         Terminal=true\n\
         Hidden=false\n\
         NoDisplay=false\n\
         X-GNOME-Autostart-enabled=true\n"
    )
}

/// LaunchAgent property list launching `exe` at load.
pub fn launch_agent_plist(exe: &Path) -> String {
    let exe = xml_escape(&exe.to_string_lossy());
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LAUNCH_AGENT_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#
    )
}

fn write_entry(path: &Path, content: &str) -> Result<(), AutostartError> {
    let io_err = |source| AutostartError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).map_err(io_err)?;
    }
    Ok(())
}

fn remove_entry(path: &Path) -> Result<bool, AutostartError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "autostart disabled");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "autostart entry not found");
            Ok(false)
        }
        Err(source) => Err(AutostartError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_entry() {
        let entry = desktop_entry(Path::new("/usr/local/bin/pulse"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("\nExec=/usr/local/bin/pulse\n"));
        assert!(entry.contains("\nX-GNOME-Autostart-enabled=true\n"));
    }

    #[test]
    fn test_desktop_entry_quotes_spaces() {
        let entry = desktop_entry(Path::new("/opt/Goal Pulse/pulse"));
        assert!(entry.contains("\nExec=\"/opt/Goal Pulse/pulse\"\n"));
    }

    #[test]
    fn test_launch_agent_plist() {
        let plist = launch_agent_plist(Path::new("/Applications/R&D/pulse"));
        assert!(plist.contains("<string>com.goalpulse.app</string>"));
        assert!(plist.contains("<string>/Applications/R&amp;D/pulse</string>"));
        assert!(plist.contains("<key>RunAtLoad</key>\n    <true/>"));
    }

    #[test]
    fn test_write_then_remove_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autostart").join(DESKTOP_FILE);

        write_entry(&path, &desktop_entry(Path::new("/bin/pulse"))).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Exec=/bin/pulse"));

        assert!(remove_entry(&path).unwrap());
        assert!(!path.exists());
        assert!(!remove_entry(&path).unwrap());
    }
}
