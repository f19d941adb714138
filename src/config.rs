//! Configuration for the data endpoints and the viewer window.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! `IVPLOT_*` environment variables. The binary applies CLI flags last.

use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::data::axis_format::TickFormatter;
use crate::error::ConfigError;

/// Minutes east of UTC of the exchange's wall clock (Asia/Tokyo).
pub const MARKET_UTC_OFFSET_MINUTES: i32 = 9 * 60;

static ENV_BASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    std::env::var("IVPLOT_BASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
});

static ENV_AUTH_TOKEN: Lazy<Option<String>> = Lazy::new(|| {
    std::env::var("IVPLOT_AUTH_TOKEN")
        .ok()
        .filter(|s| !s.is_empty())
});

static ENV_TIMEOUT_SECS: Lazy<Option<u64>> = Lazy::new(|| {
    std::env::var("IVPLOT_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
});

// ─────────────────────────────────────────────────────────────────────────────
// IvPlotConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// | Field                 | Purpose |
/// |-----------------------|---------|
/// | `base_url`            | Scheme and host the endpoint paths are appended to |
/// | `auth_token`          | Bearer token sent with every data request |
/// | `request_timeout`     | Per-request timeout |
/// | `utc_offset_minutes`  | Wall clock used for tick labels and titles |
/// | `window_title`        | Native window title |
pub struct IvPlotConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub utc_offset_minutes: i32,
    pub window_title: String,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Clone for IvPlotConfig {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            auth_token: self.auth_token.clone(),
            request_timeout: self.request_timeout,
            utc_offset_minutes: self.utc_offset_minutes,
            window_title: self.window_title.clone(),
            native_options: self.native_options.clone(),
        }
    }
}

impl std::fmt::Debug for IvPlotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IvPlotConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("utc_offset_minutes", &self.utc_offset_minutes)
            .field("window_title", &self.window_title)
            .finish_non_exhaustive()
    }
}

impl Default for IvPlotConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(30),
            utc_offset_minutes: MARKET_UTC_OFFSET_MINUTES,
            window_title: "ivplot".to_string(),
            native_options: None,
        }
    }
}

impl IvPlotConfig {
    /// Defaults, overlaid with the JSON file at `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path)?;
            let file: ConfigFile = serde_json::from_str(&text)?;
            file.apply_to(&mut cfg);
            log::info!("loaded config from {}", path.display());
        }
        cfg.apply_env();
        Ok(cfg)
    }

    /// Overlay `IVPLOT_BASE_URL`, `IVPLOT_AUTH_TOKEN` and `IVPLOT_TIMEOUT_SECS`.
    ///
    /// The variables are read on first use and cached for the process.
    pub fn apply_env(&mut self) {
        if let Some(url) = ENV_BASE_URL.as_ref() {
            self.base_url = url.clone();
        }
        if let Some(token) = ENV_AUTH_TOKEN.as_ref() {
            self.auth_token = Some(token.clone());
        }
        if let Some(secs) = *ENV_TIMEOUT_SECS {
            self.request_timeout = Duration::from_secs(secs);
        }
    }

    pub fn tick_formatter(&self) -> TickFormatter {
        TickFormatter::with_offset_minutes(self.utc_offset_minutes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File mirror
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable mirror of [`IvPlotConfig`]; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub utc_offset_minutes: Option<i32>,
    pub window_title: Option<String>,
}

impl ConfigFile {
    /// Apply the fields present in the file.
    pub fn apply_to(self, cfg: &mut IvPlotConfig) {
        if let Some(url) = self.base_url {
            cfg.base_url = url;
        }
        if self.auth_token.is_some() {
            cfg.auth_token = self.auth_token;
        }
        if let Some(secs) = self.request_timeout_secs {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(offset) = self.utc_offset_minutes {
            cfg.utc_offset_minutes = offset;
        }
        if let Some(title) = self.window_title {
            cfg.window_title = title;
        }
    }
}

impl From<&IvPlotConfig> for ConfigFile {
    fn from(cfg: &IvPlotConfig) -> Self {
        Self {
            base_url: Some(cfg.base_url.clone()),
            auth_token: cfg.auth_token.clone(),
            request_timeout_secs: Some(cfg.request_timeout.as_secs()),
            utc_offset_minutes: Some(cfg.utc_offset_minutes),
            window_title: Some(cfg.window_title.clone()),
        }
    }
}
