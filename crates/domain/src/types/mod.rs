//! Domain types and models

pub mod tracker;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use tracker::{elapsed_seconds, TrackerState};

use crate::constants::{ACCESS_TOKEN_TTL_DAYS, REFRESH_TOKEN_TTL_DAYS};

/// Role of a user inside their company
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Owner,
    Member,
}

/// Authenticated user identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: String,
}

/// Client-side authentication state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Lifecycle status of a backend time entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEntryStatus {
    Running,
    Paused,
    Stopped,
}

impl TimeEntryStatus {
    /// An entry still counting against the user (running or paused)
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Client mirror of one backend time entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: String,
    pub project_id: Option<String>,
    pub status: TimeEntryStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
}

/// Payload for starting a new time entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub user_id: String,
    pub project_id: String,
    pub start_time: DateTime<Utc>,
    pub description: String,
    pub status: TimeEntryStatus,
}

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    Archived,
}

/// A project the user can book time against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub budget: Option<f64>,
    pub color: Option<String>,
    pub status: ProjectStatus,
}

/// Form payload for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub budget: Option<f64>,
    pub color: Option<String>,
    pub status: ProjectStatus,
}

impl NewProject {
    /// Minimal project with everything but the name left to defaults
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            client_name: None,
            budget: None,
            color: None,
            status: ProjectStatus::Active,
        }
    }
}

/// A stored screenshot as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Screenshot {
    pub id: String,
    pub time_entry_id: String,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Upload payload for one captured frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScreenshot {
    pub time_entry_id: String,
    pub image_base64: String,
    pub captured_at: DateTime<Utc>,
}

/// One captured display frame, tightly packed RGBA
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Login form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub company_domain: Option<String>,
    pub password: String,
}

/// Backend response to login/registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Tokens persisted between runs, with distinct expirations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

impl StoredTokens {
    /// Stamp freshly issued tokens with their lifetimes
    pub fn issue(access: String, refresh: String, now: DateTime<Utc>) -> Self {
        Self {
            access_token: access,
            access_expires_at: now + Duration::days(ACCESS_TOKEN_TTL_DAYS),
            refresh_token: refresh,
            refresh_expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }

    /// Whether the access token is still usable at `now`
    pub fn access_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.access_expires_at
    }
}
