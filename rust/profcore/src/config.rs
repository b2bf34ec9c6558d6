//! Configuration types and defaults for the overlay
//!
//! Every field has a default; only `service_base_url` normally needs to be
//! supplied by the content script.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONTRIBUTE_URL: &str = "https://www.ratemyprofessors.com/search/professors/4744";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid config object: {0}")]
    Parse(String),
    #[error("serviceBaseUrl must start with http:// or https://, got {0:?}")]
    BaseUrl(String),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

// =============================================================================
// OverlayConfig
// =============================================================================

/// Overlay configuration (camelCase on the JS side)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Review service root, e.g. `https://reviews.example.edu`
    pub service_base_url: String,
    /// Sustained hover required before a popup opens. Default: 300
    pub hover_delay_ms: u32,
    /// Grace period after leaving anchor + popup before closing. Default: 500
    pub dismiss_grace_ms: u32,
    /// Hard budget for the professor lookup. Default: 10000
    pub fetch_timeout_ms: u32,
    /// Periodic re-scan interval for dynamically rendered tables. Default: 2000
    pub rescan_interval_ms: u32,
    /// Review cards shown before collapsing into "+N more". Default: 5
    pub max_reviews: usize,
    /// Popup width in CSS px. Default: 400
    pub popup_width: f64,
    /// Popup max height in CSS px. Default: 600
    pub popup_max_height: f64,
    /// Minimum gap to the viewport edges. Default: 10
    pub viewport_margin: f64,
    /// Where the "no reviews yet" call-to-action points
    pub contribute_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            hover_delay_ms: 300,
            dismiss_grace_ms: 500,
            fetch_timeout_ms: 10_000,
            rescan_interval_ms: 2_000,
            max_reviews: 5,
            popup_width: 400.0,
            popup_max_height: 600.0,
            viewport_margin: 10.0,
            contribute_url: DEFAULT_CONTRIBUTE_URL.to_string(),
        }
    }
}

impl OverlayConfig {
    /// Parse a JS config object. `undefined`/`null` yields the defaults.
    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Self::default().validated();
        }
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validated()
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validated()
    }

    /// Check invariants and normalize the base URL (no trailing slash).
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.validate()?;
        self.service_base_url = self.service_base_url.trim().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.service_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.service_base_url.clone()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Zero { field: "fetchTimeoutMs" });
        }
        if self.rescan_interval_ms == 0 {
            return Err(ConfigError::Zero { field: "rescanIntervalMs" });
        }
        if self.max_reviews == 0 {
            return Err(ConfigError::Zero { field: "maxReviews" });
        }
        Ok(())
    }
}
