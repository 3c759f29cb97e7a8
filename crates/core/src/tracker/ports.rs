//! Port interfaces for the work timer
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use worklens_domain::{NewTimeEntry, Result, TimeEntry};

/// Trait for the remote time-entry backend
#[async_trait]
pub trait TimeEntryGateway: Send + Sync {
    /// Create a new entry; the backend assigns its id
    async fn start_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry>;

    /// Pause a running entry
    async fn pause_entry(&self, id: &str) -> Result<()>;

    /// Resume a paused entry
    async fn resume_entry(&self, id: &str) -> Result<()>;

    /// Stop an entry
    async fn stop_entry(&self, id: &str) -> Result<()>;

    /// The user's currently running or paused entry, if any
    async fn active_entry(&self) -> Result<Option<TimeEntry>>;

    /// The user's entry history, used for lifetime totals
    async fn list_entries(&self) -> Result<Vec<TimeEntry>>;
}

/// Trait for reading the current time, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
