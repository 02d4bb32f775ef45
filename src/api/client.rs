//! REST client for the asset / attendance backend.

use super::envelope::ApiResponse;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::coordinate::{AssetLocation, Coordinate};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Operations the attendance core consumes from the backend.
pub trait AttendanceBackend {
    fn list_assets(&self) -> AppResult<Vec<AssetLocation>>;

    /// Raw today-status response, left for `core::reconcile` to interpret.
    fn today_status(&self, asset_id: &str) -> AppResult<ApiResponse>;

    fn check_in(&self, asset_id: &str, at: Coordinate) -> AppResult<ApiResponse>;

    fn check_out(&self, asset_id: &str, at: Coordinate) -> AppResult<ApiResponse>;

    fn weekly_attendance(&self, asset_id: &str) -> AppResult<Vec<AttendanceRecord>>;
}

/// Blocking HTTP implementation of [`AttendanceBackend`].
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn builder(base_url: impl Into<String>) -> HttpBackendBuilder {
        HttpBackendBuilder::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    fn send(&self, builder: RequestBuilder) -> AppResult<ApiResponse> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request)?;
        let status = response.status();
        let text = response.text()?;
        debug!(%method, %url, %status, bytes = text.len(), "received HTTP response");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        let parsed = ApiResponse::from_body(status.is_success(), body);
        if !parsed.success {
            warn!(%method, %url, %status, message = ?parsed.message, "backend reported failure");
        }
        Ok(parsed)
    }

    fn attendance_action(&self, path: &str, asset_id: &str, at: Coordinate) -> AppResult<ApiResponse> {
        let body = json!({
            "assetId": asset_id,
            "latitude": at.latitude,
            "longitude": at.longitude,
        });
        self.send(self.request(Method::POST, path).json(&body))
    }
}

impl AttendanceBackend for HttpBackend {
    fn list_assets(&self) -> AppResult<Vec<AssetLocation>> {
        let resp = self.send(self.request(Method::GET, "assets"))?;
        if !resp.success {
            return Err(AppError::Backend(resp.failure_message()));
        }

        let items = list_items(resp.data.as_ref(), &["assets", "items", "data"]);
        let assets: Vec<AssetLocation> = items.iter().filter_map(AssetLocation::from_json).collect();
        if assets.len() < items.len() {
            warn!(
                dropped = items.len() - assets.len(),
                "asset entries without an id were ignored"
            );
        }
        Ok(assets)
    }

    fn today_status(&self, asset_id: &str) -> AppResult<ApiResponse> {
        self.send(self.request(Method::GET, &format!("attendance/today/{asset_id}")))
    }

    fn check_in(&self, asset_id: &str, at: Coordinate) -> AppResult<ApiResponse> {
        self.attendance_action("attendance/check-in", asset_id, at)
    }

    fn check_out(&self, asset_id: &str, at: Coordinate) -> AppResult<ApiResponse> {
        self.attendance_action("attendance/check-out", asset_id, at)
    }

    fn weekly_attendance(&self, asset_id: &str) -> AppResult<Vec<AttendanceRecord>> {
        let resp = self.send(self.request(Method::GET, &format!("attendance/weekly/{asset_id}")))?;
        if !resp.success {
            return Err(AppError::Backend(resp.failure_message()));
        }

        Ok(list_items(resp.data.as_ref(), &["attendances", "records", "items"])
            .iter()
            .filter_map(AttendanceRecord::from_json)
            .collect())
    }
}

/// Pull a list out of `data`: either the array itself or the first array found
/// under one of `keys`.
fn list_items(data: Option<&Value>, keys: &[&str]) -> Vec<Value> {
    match data {
        Some(Value::Array(items)) => items.clone(),
        Some(obj @ Value::Object(_)) => keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Builder for [`HttpBackend`].
#[derive(Debug)]
pub struct HttpBackendBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl HttpBackendBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
            user_agent: format!("geoattend/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Bearer token sent on every request.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Per-request timeout. `None` keeps the client default.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> AppResult<HttpBackend> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("api_base_url is empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| AppError::Config(format!("invalid api_token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpBackend {
            client: builder.build()?,
            base_url: self.base_url,
        })
    }
}
