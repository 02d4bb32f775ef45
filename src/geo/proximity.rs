//! Nearest-asset search and radius gating.

use super::GEOFENCE_RADIUS_M;
use super::haversine::distance_m;
use crate::models::coordinate::{AssetLocation, Coordinate};
use serde::Serialize;

/// Radii used by the two proximity contexts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Decides which asset (if any) the attendance panel is about.
    pub discovery_m: f64,
    /// Enables the check-in control.
    pub action_m: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            discovery_m: GEOFENCE_RADIUS_M,
            action_m: GEOFENCE_RADIUS_M,
        }
    }
}

/// Distance from the user to one asset, judged against one radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    pub asset: AssetLocation,
    pub distance_m: f64,
    pub is_within_threshold: bool,
    pub threshold_m: f64,
}

impl ProximityResult {
    fn measure(user: Coordinate, asset: &AssetLocation, at: Coordinate, threshold_m: f64) -> Self {
        let d = distance_m(user, at);
        Self {
            asset: asset.clone(),
            distance_m: d,
            is_within_threshold: d <= threshold_m,
            threshold_m,
        }
    }
}

/// Outcome of a single pass over the candidate list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximityScan {
    /// First asset in input order within the radius.
    pub in_range: Option<ProximityResult>,
    /// Closest asset overall, reported even when nothing is in range.
    pub nearest: Option<ProximityResult>,
    /// Assets skipped because no coordinate alias resolved.
    pub skipped: usize,
}

impl ProximityScan {
    pub fn has_asset_in_range(&self) -> bool {
        self.in_range.is_some()
    }
}

/// Linear scan over `assets`.
///
/// Ties inside the radius go to the first asset encountered; no sorting by
/// distance is done for `in_range`. `nearest` keeps the earliest asset on
/// equal distances.
pub fn scan(user: Coordinate, assets: &[AssetLocation], threshold_m: f64) -> ProximityScan {
    let mut out = ProximityScan::default();

    for asset in assets {
        let Some(at) = asset.coordinate else {
            out.skipped += 1;
            continue;
        };

        let result = ProximityResult::measure(user, asset, at, threshold_m);
        if result.distance_m.is_nan() {
            out.skipped += 1;
            continue;
        }

        if result.is_within_threshold && out.in_range.is_none() {
            out.in_range = Some(result.clone());
        }

        let closer = out
            .nearest
            .as_ref()
            .is_none_or(|best| result.distance_m < best.distance_m);
        if closer {
            out.nearest = Some(result);
        }
    }

    out
}

/// Same as [`scan`] but tolerates a missing user position.
pub fn scan_from(user: Option<Coordinate>, assets: &[AssetLocation], threshold_m: f64) -> ProximityScan {
    match user {
        Some(u) => scan(u, assets, threshold_m),
        None => ProximityScan::default(),
    }
}

/// Judge one specific asset against `threshold_m`.
/// `None` when the asset has no coordinate.
pub fn within(user: Coordinate, asset: &AssetLocation, threshold_m: f64) -> Option<ProximityResult> {
    let at = asset.coordinate?;
    Some(ProximityResult::measure(user, asset, at, threshold_m))
}
