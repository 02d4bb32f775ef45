//! Unified application error type.
//! All modules (db, core, api, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Backend
    // ---------------------------
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend rejected the request: {0}")]
    Backend(String),

    // ---------------------------
    // Location / geofence
    // ---------------------------
    #[error("Location unavailable: {0}")]
    Location(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Asset '{0}' has no coordinates")]
    AssetWithoutCoordinate(String),

    #[error("Too far from '{asset}': {distance_m:.0} m away (limit {threshold_m:.0} m)")]
    OutOfRange {
        asset: String,
        distance_m: f64,
        threshold_m: f64,
    },

    // ---------------------------
    // Attendance state
    // ---------------------------
    #[error("Invalid attendance transition: {0}")]
    InvalidTransition(String),

    #[error("Another attendance request is still in flight")]
    RequestInFlight,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
