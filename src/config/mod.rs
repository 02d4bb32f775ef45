use crate::errors::{AppError, AppResult};
use crate::geo::{GEOFENCE_RADIUS_M, Thresholds};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the configuration directory (tests, portable installs).
pub const CONFIG_DIR_ENV: &str = "GEOATTEND_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_radius")]
    pub discovery_radius_m: f64,
    #[serde(default = "default_radius")]
    pub action_radius_m: f64,
    #[serde(default)]
    pub checkout_requires_proximity: bool,
    #[serde(default)]
    pub default_latitude: Option<f64>,
    #[serde(default)]
    pub default_longitude: Option<f64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_radius() -> f64 {
    GEOFENCE_RADIUS_M
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            database: default_database(),
            discovery_radius_m: default_radius(),
            action_radius_m: default_radius(),
            checkout_requires_proximity: false,
            default_latitude: None,
            default_longitude: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return expand_tilde(&dir);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("geoattend")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".geoattend")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("geoattend.conf")
    }

    /// Return the full path of the local SQLite store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("geoattend.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        for (key, value) in [
            ("discovery_radius_m", self.discovery_radius_m),
            ("action_radius_m", self.action_radius_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::Config(format!(
                    "{key} must be a positive number of meters, got {value}"
                )));
            }
        }

        if self.default_latitude.is_some() != self.default_longitude.is_some() {
            return Err(AppError::Config(
                "default_latitude and default_longitude must be set together".into(),
            ));
        }

        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            discovery_m: self.discovery_radius_m,
            action_m: self.action_radius_m,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Initialize configuration and local store files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}
