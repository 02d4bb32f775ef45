use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Field names the backend has used for an asset latitude, in lookup order.
pub const LATITUDE_ALIASES: &[&str] = &[
    "lat",
    "latitude",
    "latitude_coordinate",
    "latitudeCoordinate",
];

/// Field names the backend has used for an asset longitude, in lookup order.
pub const LONGITUDE_ALIASES: &[&str] = &[
    "lng",
    "lon",
    "long",
    "longitude",
    "longitude_coordinate",
    "longitudeCoordinate",
];

const ID_ALIASES: &[&str] = &["id", "_id", "asset_id", "assetId"];
const NAME_ALIASES: &[&str] = &["name", "asset_name", "assetName", "title"];

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a `"lat,lon"` pair (whitespace around either number is ignored).
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lon.trim().parse::<f64>().ok()?;
        Self::finite(latitude, longitude)
    }

    /// Build a coordinate only when both components are finite numbers.
    pub fn finite(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self::new(latitude, longitude))
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// An asset as a geofence candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetLocation {
    pub id: String,
    pub name: String,
    /// `None` when no alias resolved; such an asset is never a candidate.
    pub coordinate: Option<Coordinate>,
}

impl AssetLocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
        }
    }

    /// Build from one element of the backend asset listing.
    /// Returns `None` only when the element carries no usable id.
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = first_string(value, ID_ALIASES)?;
        let name = first_string(value, NAME_ALIASES).unwrap_or_else(|| id.clone());

        Some(Self {
            id,
            name,
            coordinate: resolve_coordinate(value),
        })
    }

    pub fn label(&self) -> String {
        if self.name == self.id {
            self.id.clone()
        } else {
            format!("{} ({})", self.name, self.id)
        }
    }
}

/// Resolve a coordinate by probing the alias lists in order.
/// The first alias holding a finite number (or numeric string) wins.
pub fn resolve_coordinate(value: &Value) -> Option<Coordinate> {
    let latitude = first_number(value, LATITUDE_ALIASES)?;
    let longitude = first_number(value, LONGITUDE_ALIASES)?;
    Coordinate::finite(latitude, longitude)
}

fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
