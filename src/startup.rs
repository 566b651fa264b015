//! "Just booted" detection.
//!
//! The shell greets the user with today's tasks when the machine came up a
//! few minutes ago. A marker file remembers which boot was already greeted,
//! so restarting the program later in the same session stays quiet.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

pub const MARKER_FILE: &str = "startup_marker";

/// The kernel's boot time can drift by a second or two between reads
/// (clock adjustments), so boots closer than this are the same boot.
const SAME_BOOT_TOLERANCE_SECS: i64 = 5;

/// Whether this launch happens shortly after boot and the boot has not been
/// greeted yet. Unknown boot time means false.
pub fn detect(data_dir: &Path, window: Duration) -> bool {
    let Some(boot) = boot_time() else {
        debug!("boot time unavailable on this platform");
        return false;
    };
    let now = unix_now();
    detect_at(&data_dir.join(MARKER_FILE), boot, now, window)
}

fn detect_at(marker: &Path, boot: i64, now: i64, window: Duration) -> bool {
    if !booted_recently(boot, now, window) {
        return false;
    }

    if let Some(greeted) = read_marker(marker) {
        if (greeted - boot).abs() <= SAME_BOOT_TOLERANCE_SECS {
            debug!(boot, "boot already greeted");
            return false;
        }
    }

    if let Err(e) = write_marker(marker, boot) {
        // A failed write only means the next launch may greet again.
        warn!(error = %e, path = %marker.display(), "failed to write startup marker");
    }
    info!(boot, now, "system startup detected");
    true
}

/// `now - boot` is within `window`. A boot time in the future (clock skew)
/// does not count.
pub fn booted_recently(boot: i64, now: i64, window: Duration) -> bool {
    let Some(elapsed) = now.checked_sub(boot) else {
        return false;
    };
    elapsed >= 0 && (elapsed as u64) < window.as_secs()
}

/// Extract `btime` (seconds since the epoch) from `/proc/stat` contents.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub fn parse_proc_stat_btime(contents: &str) -> Option<i64> {
    contents.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("btime"), Some(value)) => value.parse().ok(),
            _ => None,
        }
    })
}

/// Extract the seconds field from `sysctl -n kern.boottime` output, e.g.
/// `{ sec = 1700000000, usec = 123456 } Tue Nov 14 22:13:20 2023`.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn parse_kern_boottime(output: &str) -> Option<i64> {
    let rest = &output[output.find("sec")? + 3..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(target_os = "linux")]
fn boot_time() -> Option<i64> {
    let contents = std::fs::read_to_string("/proc/stat").ok()?;
    parse_proc_stat_btime(&contents)
}

#[cfg(target_os = "macos")]
fn boot_time() -> Option<i64> {
    let output = std::process::Command::new("sysctl")
        .args(["-n", "kern.boottime"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_kern_boottime(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn boot_time() -> Option<i64> {
    None
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn read_marker(path: &Path) -> Option<i64> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn write_marker(path: &Path, boot: i64) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, boot.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEN_MINUTES: Duration = Duration::from_secs(600);

    #[rstest]
    #[case(1_000, 1_000, true)]
    #[case(1_000, 1_599, true)]
    #[case(1_000, 1_600, false)]
    #[case(1_000, 90_000, false)]
    #[case(2_000, 1_000, false)]
    fn test_booted_recently(#[case] boot: i64, #[case] now: i64, #[case] expected: bool) {
        assert_eq!(booted_recently(boot, now, TEN_MINUTES), expected);
    }

    #[test]
    fn test_parse_proc_stat() {
        let stat = "cpu  10 0 20 300 0 0 0 0 0 0\n\
                    intr 12345\n\
                    ctxt 999\n\
                    btime 1718000000\n\
                    processes 4242\n";
        assert_eq!(parse_proc_stat_btime(stat), Some(1_718_000_000));
        assert_eq!(parse_proc_stat_btime("cpu 1 2 3\n"), None);
        assert_eq!(parse_proc_stat_btime("btime soon\n"), None);
    }

    #[rstest]
    #[case("{ sec = 1700000000, usec = 123456 } Tue Nov 14 22:13:20 2023\n", Some(1_700_000_000))]
    #[case("{ sec=42, usec=0 }", Some(42))]
    #[case("", None)]
    #[case("kern.boottime: unknown", None)]
    fn test_parse_kern_boottime(#[case] output: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_kern_boottime(output), expected);
    }

    #[test]
    fn test_fires_once_per_boot() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(MARKER_FILE);
        let boot = 1_000_000;

        assert!(detect_at(&marker, boot, boot + 30, TEN_MINUTES));
        assert_eq!(read_marker(&marker), Some(boot));

        // Same boot, program restarted.
        assert!(!detect_at(&marker, boot, boot + 120, TEN_MINUTES));
        assert!(!detect_at(&marker, boot + 1, boot + 121, TEN_MINUTES));

        // Next boot.
        let next_boot = boot + 86_400;
        assert!(detect_at(&marker, next_boot, next_boot + 10, TEN_MINUTES));
    }

    #[test]
    fn test_outside_window_leaves_marker_alone() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(MARKER_FILE);

        assert!(!detect_at(&marker, 1_000, 1_000 + 3_600, TEN_MINUTES));
        assert!(!marker.exists());
    }

    #[test]
    fn test_unwritable_marker_still_signals() {
        let dir = tempfile::tempdir().unwrap();
        // The parent is a regular file, so the directory cannot be created.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let marker = blocker.join(MARKER_FILE);

        assert!(detect_at(&marker, 5_000, 5_010, TEN_MINUTES));
    }
}
