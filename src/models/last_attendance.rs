use super::coordinate::Coordinate;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Which action produced a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceAction::CheckIn => "check_in",
            AttendanceAction::CheckOut => "check_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "check_in" => Some(AttendanceAction::CheckIn),
            "check_out" => Some(AttendanceAction::CheckOut),
            _ => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            AttendanceAction::CheckIn => "Checked in",
            AttendanceAction::CheckOut => "Checked out",
        }
    }
}

/// Display-only hint about the last successful action on this machine.
/// Never an input to gating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastAttendance {
    pub action: AttendanceAction,
    pub timestamp: DateTime<Utc>,
    pub asset_id: String,
    pub asset_name: String,
    pub position: Coordinate,
}

impl LastAttendance {
    pub fn hint(&self) -> String {
        format!(
            "{} at {} on {}",
            self.action.verb(),
            self.asset_name,
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        )
    }
}
