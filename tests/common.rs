#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::Utc;
use geoattend::api::{ApiResponse, AttendanceBackend};
use geoattend::errors::{AppError, AppResult};
use geoattend::geo::haversine::EARTH_RADIUS_M;
use geoattend::models::attendance::AttendanceRecord;
use geoattend::models::coordinate::{AssetLocation, Coordinate};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const HQ: Coordinate = Coordinate {
    latitude: 45.4642,
    longitude: 9.19,
};

/// Binary under test, with its config directory isolated under the temp dir.
pub fn geo(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("geoattend");
    cmd.env("GEOATTEND_CONFIG_DIR", temp_dir(name))
        .env_remove("GEOATTEND_POSITION")
        .env_remove("EDITOR");
    cmd
}

/// Fresh per-test directory inside the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("geoattend_{}", name));
    path
}

/// Create a unique local store path and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let dir = temp_dir(name);
    fs::create_dir_all(&dir).ok();
    let path = dir.join("geoattend.sqlite");
    fs::remove_file(&path).ok();
    path.to_string_lossy().to_string()
}

/// A point `meters` due north of `from`.
pub fn north_of(from: Coordinate, meters: f64) -> Coordinate {
    let dlat = (meters / EARTH_RADIUS_M).to_degrees();
    Coordinate::new(from.latitude + dlat, from.longitude)
}

pub fn asset(id: &str, name: &str, at: Option<Coordinate>) -> AssetLocation {
    AssetLocation::new(id, name, at)
}

/// In-memory stand-in for the REST backend. It keeps one record per asset
/// and behaves like the server: check-in creates, check-out closes.
#[derive(Default)]
pub struct FakeBackend {
    pub assets: Vec<AssetLocation>,
    pub today: RefCell<Option<Value>>,
    pub fail_assets: Cell<bool>,
    pub fail_status: Cell<bool>,
    pub fail_actions: Cell<bool>,
    pub reject_actions: Cell<bool>,
    pub echo_record: Cell<bool>,
    pub status_calls: Cell<usize>,
    pub check_in_calls: Cell<usize>,
    pub check_out_calls: Cell<usize>,
}

impl FakeBackend {
    pub fn with_assets(assets: Vec<AssetLocation>) -> Self {
        let fake = Self {
            assets,
            ..Self::default()
        };
        fake.echo_record.set(true);
        fake
    }

    pub fn set_today(&self, body: Value) {
        *self.today.borrow_mut() = Some(body);
    }

    fn current(&self) -> Value {
        self.today.borrow().clone().unwrap_or(Value::Null)
    }

    fn action_result(&self, record: Value) -> AppResult<ApiResponse> {
        if self.fail_actions.get() {
            return Err(AppError::Backend("connection reset".into()));
        }
        if self.reject_actions.get() {
            return Ok(ApiResponse::failed("attendance window closed"));
        }
        self.set_today(record.clone());
        if self.echo_record.get() {
            Ok(ApiResponse::ok(record))
        } else {
            Ok(ApiResponse::ok(json!({ "message": "ok" })))
        }
    }
}

impl AttendanceBackend for FakeBackend {
    fn list_assets(&self) -> AppResult<Vec<AssetLocation>> {
        if self.fail_assets.get() {
            return Err(AppError::Backend("assets offline".into()));
        }
        Ok(self.assets.clone())
    }

    fn today_status(&self, _asset_id: &str) -> AppResult<ApiResponse> {
        self.status_calls.set(self.status_calls.get() + 1);
        if self.fail_status.get() {
            return Err(AppError::Backend("status offline".into()));
        }
        Ok(ApiResponse::from_body(true, json!({ "success": true, "data": self.current() })))
    }

    fn check_in(&self, asset_id: &str, _at: Coordinate) -> AppResult<ApiResponse> {
        self.check_in_calls.set(self.check_in_calls.get() + 1);
        self.action_result(json!({
            "id": 1,
            "assetId": asset_id,
            "checkInTime": Utc::now().to_rfc3339(),
            "checkOutTime": null,
            "status": "checked_in",
        }))
    }

    fn check_out(&self, asset_id: &str, _at: Coordinate) -> AppResult<ApiResponse> {
        self.check_out_calls.set(self.check_out_calls.get() + 1);
        let check_in = self
            .current()
            .get("checkInTime")
            .cloned()
            .unwrap_or(Value::Null);
        self.action_result(json!({
            "id": 1,
            "assetId": asset_id,
            "checkInTime": check_in,
            "checkOutTime": Utc::now().to_rfc3339(),
            "status": "checked_out",
        }))
    }

    fn weekly_attendance(&self, _asset_id: &str) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self
            .today
            .borrow()
            .as_ref()
            .and_then(AttendanceRecord::from_json)
            .into_iter()
            .collect())
    }
}
