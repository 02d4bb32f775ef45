//! Normalization of the backend "today status" payload.
//!
//! The endpoint has answered with three different shapes over time:
//!
//! * nothing at all (`null`, `{}`, or an unsuccessful envelope);
//! * a wrapper `{ hasCheckedIn, hasCheckedOut, attendance? }`;
//! * the attendance record itself, bare or under `attendance`.
//!
//! Every caller goes through [`TodayPayload::classify`] and [`reconcile`], so the
//! rest of the crate only ever sees a [`TodayAttendance`].

use crate::models::attendance::{AttendanceRecord, TodayAttendance, TodayStatus};
use serde_json::Value;

const CHECKED_IN_FLAGS: &[&str] = &["hasCheckedIn", "has_checked_in"];
const CHECKED_OUT_FLAGS: &[&str] = &["hasCheckedOut", "has_checked_out"];
const NESTED_RECORD_KEYS: &[&str] = &["attendance", "record", "todayAttendance"];

/// The recognised payload shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TodayPayload {
    Absent,
    Flags {
        has_checked_in: bool,
        has_checked_out: bool,
        attendance: Option<AttendanceRecord>,
    },
    Record(AttendanceRecord),
    Unrecognized,
}

impl TodayPayload {
    /// Sort a response body into one of the known shapes.
    /// `success` is the envelope verdict; `false` always means absent.
    pub fn classify(body: Option<&Value>, success: bool) -> Self {
        if !success {
            return TodayPayload::Absent;
        }

        let body = match body {
            None | Some(Value::Null) => return TodayPayload::Absent,
            Some(Value::Object(obj)) if obj.is_empty() => return TodayPayload::Absent,
            Some(v) => v,
        };

        if !body.is_object() {
            return TodayPayload::Unrecognized;
        }

        let checked_in = first_flag(body, CHECKED_IN_FLAGS);
        let checked_out = first_flag(body, CHECKED_OUT_FLAGS);

        if checked_in.is_some() || checked_out.is_some() {
            let attendance = NESTED_RECORD_KEYS
                .iter()
                .filter_map(|k| body.get(*k))
                .find_map(AttendanceRecord::from_json);

            return TodayPayload::Flags {
                has_checked_in: checked_in.unwrap_or(false),
                has_checked_out: checked_out.unwrap_or(false),
                attendance,
            };
        }

        // bare record, or a record wrapped without flags
        let record = AttendanceRecord::from_json(body).or_else(|| {
            NESTED_RECORD_KEYS
                .iter()
                .filter_map(|k| body.get(*k))
                .find_map(AttendanceRecord::from_json)
        });
        match record {
            Some(record) => TodayPayload::Record(record),
            None => TodayPayload::Unrecognized,
        }
    }
}

/// Project a classified payload onto the tri-state model.
pub fn reconcile(payload: TodayPayload) -> TodayAttendance {
    match payload {
        TodayPayload::Absent | TodayPayload::Unrecognized => TodayAttendance::not_checked_in(),

        TodayPayload::Flags {
            attendance: Some(record),
            ..
        } => TodayAttendance::from_record(record),

        TodayPayload::Flags {
            has_checked_in,
            has_checked_out,
            attendance: None,
        } => {
            // a checked-out flag implies the day already had a check-in
            if has_checked_out {
                TodayAttendance::from_status(TodayStatus::CheckedOut)
            } else if has_checked_in {
                TodayAttendance::from_status(TodayStatus::CheckedIn)
            } else {
                TodayAttendance::not_checked_in()
            }
        }

        TodayPayload::Record(record) => TodayAttendance::from_record(record),
    }
}

/// Shorthand for `reconcile(TodayPayload::classify(body, success))`.
pub fn reconcile_body(body: Option<&Value>, success: bool) -> TodayAttendance {
    reconcile(TodayPayload::classify(body, success))
}

fn first_flag(body: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| match body.get(*k)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
