/// ANSI color helper utilities for terminal output.
use crate::models::attendance::TodayStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

pub fn color_for_status(status: TodayStatus) -> &'static str {
    match status {
        TodayStatus::NotCheckedIn => YELLOW,
        TodayStatus::CheckedIn => GREEN,
        TodayStatus::CheckedOut => GREY,
    }
}

pub fn colorize_status(status: TodayStatus) -> String {
    format!("{}{}{}", color_for_status(status), status, RESET)
}

/// Green inside the geofence, red outside.
pub fn colorize_range(text: &str, in_range: bool) -> String {
    let color = if in_range { GREEN } else { RED };
    format!("{color}{text}{RESET}")
}

/// Grey for placeholders such as `--:--`.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
