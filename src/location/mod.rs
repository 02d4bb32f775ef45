//! Device position sources.
//!
//! A CLI has no geolocation API, so the "device" position comes from, in order:
//! the `--lat/--lon` flags, the `GEOATTEND_POSITION` environment variable, and
//! the defaults stored in the configuration file. The position is read on
//! demand and never watched.

use crate::config::Config;
use crate::models::coordinate::Coordinate;
use std::env;
use thiserror::Error;

pub const POSITION_ENV: &str = "GEOATTEND_POSITION";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("no position source is configured; pass --lat/--lon or set {POSITION_ENV}")]
    Unavailable,

    #[error("invalid position '{0}', expected \"<lat>,<lon>\"")]
    Invalid(String),
}

/// Single-shot position query.
pub trait LocationProvider {
    fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// A position fixed at construction time (flags, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// Always unavailable, like a denied permission prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Layered lookup over the CLI flags, environment and config.
#[derive(Debug, Clone, Default)]
pub struct LayeredLocation {
    pub flag: Option<(f64, f64)>,
    pub config: Option<(f64, f64)>,
}

impl LayeredLocation {
    pub fn new(flag_lat: Option<f64>, flag_lon: Option<f64>, cfg: &Config) -> Self {
        Self {
            flag: flag_lat.zip(flag_lon),
            config: cfg.default_latitude.zip(cfg.default_longitude),
        }
    }
}

impl LocationProvider for LayeredLocation {
    fn current_position(&self) -> Result<Coordinate, LocationError> {
        if let Some((lat, lon)) = self.flag {
            return Coordinate::finite(lat, lon)
                .ok_or_else(|| LocationError::Invalid(format!("{lat},{lon}")));
        }

        if let Ok(raw) = env::var(POSITION_ENV)
            && !raw.trim().is_empty()
        {
            return Coordinate::parse_pair(&raw).ok_or(LocationError::Invalid(raw));
        }

        match self.config {
            Some((lat, lon)) => Coordinate::finite(lat, lon)
                .ok_or_else(|| LocationError::Invalid(format!("{lat},{lon}"))),
            None => Err(LocationError::Unavailable),
        }
    }
}
