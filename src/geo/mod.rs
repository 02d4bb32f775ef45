//! Geofence geometry: great-circle distance and nearest-asset search.

pub mod haversine;
pub mod proximity;

/// Canonical geofence radius in meters, shared by discovery and action gating.
pub const GEOFENCE_RADIUS_M: f64 = 200.0;

pub use haversine::distance_m;
pub use proximity::{ProximityResult, ProximityScan, Thresholds};
