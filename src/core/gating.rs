//! Enablement of the check-in / check-out controls.

use crate::geo::ProximityResult;
use crate::models::attendance::{TodayAttendance, TodayStatus};
use serde::Serialize;

/// Whether check-out re-verifies the geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPolicy {
    #[default]
    Unrestricted,
    RequireProximity,
}

impl CheckoutPolicy {
    pub fn from_flag(requires_proximity: bool) -> Self {
        if requires_proximity {
            CheckoutPolicy::RequireProximity
        } else {
            CheckoutPolicy::Unrestricted
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionGate {
    pub can_check_in: bool,
    pub can_check_out: bool,
    /// Why check-in is disabled, when it is.
    pub check_in_reason: Option<String>,
    /// Why check-out is disabled, when it is.
    pub check_out_reason: Option<String>,
}

/// Derive both enablement flags.
///
/// `action` is the proximity of the selected asset judged against the action
/// radius; `None` means no position or no coordinate for the asset.
pub fn evaluate(
    today: &TodayAttendance,
    action: Option<&ProximityResult>,
    in_flight: bool,
    policy: CheckoutPolicy,
) -> ActionGate {
    let in_range = action.is_some_and(|p| p.is_within_threshold);

    let check_in_reason = if in_flight {
        Some("a request is in progress".to_string())
    } else if today.status != TodayStatus::NotCheckedIn {
        Some(format!("already {}", today.status.as_str().replace('_', " ")))
    } else if !in_range {
        Some(out_of_range_reason(action))
    } else {
        None
    };

    let check_out_reason = if in_flight {
        Some("a request is in progress".to_string())
    } else {
        match today.status {
            TodayStatus::NotCheckedIn => Some("not checked in today".to_string()),
            TodayStatus::CheckedOut => Some("already checked out".to_string()),
            TodayStatus::CheckedIn => {
                if policy == CheckoutPolicy::RequireProximity && !in_range {
                    Some(out_of_range_reason(action))
                } else {
                    None
                }
            }
        }
    };

    ActionGate {
        can_check_in: check_in_reason.is_none(),
        can_check_out: check_out_reason.is_none(),
        check_in_reason,
        check_out_reason,
    }
}

fn out_of_range_reason(action: Option<&ProximityResult>) -> String {
    match action {
        Some(p) => format!(
            "{:.0} m from {}, limit is {:.0} m",
            p.distance_m, p.asset.name, p.threshold_m
        ),
        None => "location or asset coordinates unavailable".to_string(),
    }
}
