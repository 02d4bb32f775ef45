//! Per (user, asset, day) attendance state machine.

use crate::errors::{AppError, AppResult};
use crate::models::attendance::TodayStatus;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    CheckIn,
    CheckOut,
}

/// NOT_CHECKED_IN → CHECKED_IN → CHECKED_OUT, terminal for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceState {
    pub day: NaiveDate,
    pub status: TodayStatus,
}

impl AttendanceState {
    pub fn new(day: NaiveDate, status: TodayStatus) -> Self {
        Self { day, status }
    }

    /// Check a transition without applying it.
    pub fn permits(&self, t: Transition) -> bool {
        matches!(
            (self.status, t),
            (TodayStatus::NotCheckedIn, Transition::CheckIn)
                | (TodayStatus::CheckedIn, Transition::CheckOut)
        )
    }

    pub fn apply(&mut self, t: Transition) -> AppResult<TodayStatus> {
        if !self.permits(t) {
            return Err(AppError::InvalidTransition(format!(
                "cannot {} while {} on {}",
                match t {
                    Transition::CheckIn => "check in",
                    Transition::CheckOut => "check out",
                },
                self.status.as_str(),
                self.day
            )));
        }

        self.status = match t {
            Transition::CheckIn => TodayStatus::CheckedIn,
            Transition::CheckOut => TodayStatus::CheckedOut,
        };
        Ok(self.status)
    }

    /// A new calendar day starts from a fresh record.
    pub fn roll_to(&mut self, day: NaiveDate) {
        if day != self.day {
            self.day = day;
            self.status = TodayStatus::NotCheckedIn;
        }
    }
}
