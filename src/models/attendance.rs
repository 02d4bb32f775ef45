use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Keys whose presence marks a JSON object as an attendance record.
const RECORD_KEYS: &[&str] = &[
    "status",
    "checkInTime",
    "check_in_time",
    "checkIn",
    "check_in",
    "checkOutTime",
    "check_out_time",
    "checkOut",
    "check_out",
];

/// Status tag carried by a server-side attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    CheckedIn,
    CheckedOut,
}

impl RecordStatus {
    /// Accepts `checked_in`, `checked-in`, `CHECKED_IN`, `checkedIn` and friends.
    pub fn from_api_str(s: &str) -> Option<Self> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "checkedin" | "in" => Some(Self::CheckedIn),
            "checkedout" | "out" => Some(Self::CheckedOut),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::CheckedIn => "checked_in",
            RecordStatus::CheckedOut => "checked_out",
        }
    }
}

/// Field names the backend has used for each record field, in lookup order.
/// The first alias holding a usable value wins; later spellings are ignored.
const ID_ALIASES: &[&str] = &["id", "_id"];
const ASSET_ID_ALIASES: &[&str] = &["assetId", "asset_id"];
const CHECK_IN_ALIASES: &[&str] = &["checkInTime", "check_in_time", "checkIn", "check_in"];
const CHECK_OUT_ALIASES: &[&str] = &["checkOutTime", "check_out_time", "checkOut", "check_out"];
const STATUS_ALIASES: &[&str] = &["status"];

/// One (user, asset, day) attendance record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttendanceRecord {
    pub id: Option<String>,
    #[serde(rename = "assetId")]
    pub asset_id: Option<String>,
    #[serde(rename = "checkInTime")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(rename = "checkOutTime")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: Option<RecordStatus>,
}

impl AttendanceRecord {
    /// True when `value` is an object carrying at least one record field.
    pub fn looks_like_record(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| RECORD_KEYS.iter().any(|k| obj.contains_key(*k)))
    }

    /// Build from a raw JSON object by probing the alias lists.
    /// Several spellings of one field may coexist; values that do not parse
    /// are treated as absent rather than failing the whole record.
    pub fn from_json(value: &Value) -> Option<Self> {
        if !Self::looks_like_record(value) {
            return None;
        }

        Some(Self {
            id: first_string(value, ID_ALIASES),
            asset_id: first_string(value, ASSET_ID_ALIASES),
            check_in_time: first_timestamp(value, CHECK_IN_ALIASES),
            check_out_time: first_timestamp(value, CHECK_OUT_ALIASES),
            status: STATUS_ALIASES
                .iter()
                .find_map(|k| value.get(*k)?.as_str().and_then(RecordStatus::from_api_str)),
        })
    }

    /// Status tag, falling back to the timestamps when the tag is missing.
    pub fn effective_status(&self) -> Option<RecordStatus> {
        self.status.or(if self.check_out_time.is_some() {
            Some(RecordStatus::CheckedOut)
        } else if self.check_in_time.is_some() {
            Some(RecordStatus::CheckedIn)
        } else {
            None
        })
    }
}

/// Client-side projection of today's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TodayStatus {
    #[default]
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

impl TodayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodayStatus::NotCheckedIn => "not_checked_in",
            TodayStatus::CheckedIn => "checked_in",
            TodayStatus::CheckedOut => "checked_out",
        }
    }
}

impl From<RecordStatus> for TodayStatus {
    fn from(s: RecordStatus) -> Self {
        match s {
            RecordStatus::CheckedIn => TodayStatus::CheckedIn,
            RecordStatus::CheckedOut => TodayStatus::CheckedOut,
        }
    }
}

impl fmt::Display for TodayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TodayStatus::NotCheckedIn => "Not checked in",
            TodayStatus::CheckedIn => "Checked in",
            TodayStatus::CheckedOut => "Checked out",
        };
        f.write_str(label)
    }
}

/// Canonical today view: tri-state plus whatever timestamps the payload carried.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TodayAttendance {
    pub status: TodayStatus,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub record: Option<AttendanceRecord>,
}

impl TodayAttendance {
    pub fn not_checked_in() -> Self {
        Self::default()
    }

    pub fn from_status(status: TodayStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn from_record(record: AttendanceRecord) -> Self {
        let status = record
            .effective_status()
            .map(TodayStatus::from)
            .unwrap_or_default();
        Self {
            status,
            check_in: record.check_in_time,
            check_out: record.check_out_time,
            record: Some(record),
        }
    }
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_timestamp(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .find_map(|k| value.get(*k)?.as_str().and_then(parse_timestamp))
}

/// RFC 3339 first, then the naive `YYYY-MM-DD HH:MM:SS` form (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
