//! Configuration structures
//!
//! Plain data carried from the loader into the application context. Loading
//! (environment variables, config files) lives in the infra crate.

use serde::{Deserialize, Serialize};

use crate::constants::{CAPTURE_INITIAL_DELAY_SECS, CAPTURE_INTERVAL_SECS, SCREENSHOT_JPEG_QUALITY};

/// Configuration for the application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Remote backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Fixed backend origin, including the API prefix
    pub origin: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { origin: "https://api.worklens.app/api".to_string(), timeout_seconds: 30 }
    }
}

/// Screenshot capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds between periodic screenshots
    pub interval_seconds: u64,
    /// Delay before the first screenshot, letting the stream stabilize
    pub initial_delay_seconds: u64,
    /// JPEG quality (1-100) for uploaded frames
    pub jpeg_quality: u8,
    /// Whether capture is enabled at all
    pub enabled: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_seconds: CAPTURE_INTERVAL_SECS,
            initial_delay_seconds: CAPTURE_INITIAL_DELAY_SECS,
            jpeg_quality: SCREENSHOT_JPEG_QUALITY,
            enabled: true,
        }
    }
}

/// Token storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Keyring service name under which tokens are stored
    pub keyring_service: String,
    /// Keyring account name
    pub keyring_account: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { keyring_service: "worklens".to_string(), keyring_account: "main".to_string() }
    }
}
