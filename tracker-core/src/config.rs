use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::models::GeoPoint;

pub const APP_DIR_NAME: &str = "covid-tracker";
pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api: ApiConfig,
    pub map: MapConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
    /// Trailing window requested from the historical endpoint.
    pub history_days: u32,
    /// Zero disables the periodic refresh.
    pub refresh_interval_minutes: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: GeoPoint,
    pub default_zoom: f64,
    pub country_zoom: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background_color: [u8; 3],
    pub panel_color: [u8; 3],
    pub accent_color: [u8; 3],
    pub text_color: [u8; 3],
    pub secondary_text_color: [u8; 3],
    pub border_color: [u8; 3],
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: 10,
            history_days: 120,
            refresh_interval_minutes: 10,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_minutes > 0)
            .then(|| Duration::from_secs(self.refresh_interval_minutes * 60))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: GeoPoint::new(34.80746, -40.469152),
            default_zoom: 3.0,
            country_zoom: 4.0,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 30],
            panel_color: [37, 37, 38],
            accent_color: [204, 16, 52],
            text_color: [204, 204, 204],
            secondary_text_color: [150, 150, 150],
            border_color: [60, 60, 60],
        }
    }
}

impl TrackerConfig {
    /// `<config_dir>/covid-tracker/config.json`
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR_NAME).join("config.json"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, path = %path.display(), "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Loads from the platform config directory.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_or_default(path),
            Err(err) => {
                warn!(error = %err, "using default config");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

impl ThemeConfig {
    pub fn background_color32(&self) -> egui::Color32 {
        color32(self.background_color)
    }

    pub fn panel_color32(&self) -> egui::Color32 {
        color32(self.panel_color)
    }

    pub fn accent_color32(&self) -> egui::Color32 {
        color32(self.accent_color)
    }

    pub fn text_color32(&self) -> egui::Color32 {
        color32(self.text_color)
    }

    pub fn secondary_text_color32(&self) -> egui::Color32 {
        color32(self.secondary_text_color)
    }

    pub fn border_color32(&self) -> egui::Color32 {
        color32(self.border_color)
    }
}

/// Colour of a metric's bubbles, card accent and chart line.
pub fn metric_color32(metric: crate::models::Metric) -> egui::Color32 {
    color32(metric.rgb())
}
