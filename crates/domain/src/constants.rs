//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Screenshot capture cadence
pub const CAPTURE_INTERVAL_SECS: u64 = 300;
pub const CAPTURE_INITIAL_DELAY_SECS: u64 = 3;
pub const SCREENSHOT_JPEG_QUALITY: u8 = 60;

// Screenshot gallery
pub const GALLERY_DISPLAY_LIMIT: usize = 6;
pub const GALLERY_REFRESH_SECS: u64 = 10;

// Token lifetimes, matching the backend session policy
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 1;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

// Description attached to entries started from the timer
pub const DEFAULT_ENTRY_DESCRIPTION: &str = "Tracked work session";
