//! Time-entry client
//!
//! Implements the tracker's backend gateway port. Wire entries nest their
//! timing in a `timeInterval` object; the client flattens that into the
//! domain shape and derives a duration from start/end when the backend
//! omits one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worklens_core::tracker::TimeEntryGateway;
use worklens_domain::{NewTimeEntry, Result, TimeEntry, TimeEntryStatus};

use super::gateway::ApiGateway;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTimeEntryRequest<'a> {
    user_id: &'a str,
    project_id: &'a str,
    start_time: DateTime<Utc>,
    description: &'a str,
    status: TimeEntryStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeEntryDto {
    id: String,
    #[serde(default)]
    project_id: Option<String>,
    status: TimeEntryStatus,
    #[serde(default)]
    time_interval: Option<TimeIntervalDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeIntervalDto {
    #[serde(default)]
    start: Option<DateTime<Utc>>,
    #[serde(default)]
    end: Option<DateTime<Utc>>,
    #[serde(default)]
    duration: Option<i64>,
}

impl TimeEntryDto {
    fn into_domain(self) -> TimeEntry {
        let interval = self.time_interval.unwrap_or_default();
        let duration_seconds = interval.duration.or_else(|| match (interval.start, interval.end) {
            (Some(start), Some(end)) => Some((end - start).num_seconds().max(0)),
            _ => None,
        });
        TimeEntry {
            id: self.id,
            project_id: self.project_id,
            status: self.status,
            start_time: interval.start,
            duration_seconds,
        }
    }
}

/// The active-entry endpoint answers with either a single entry or an array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ActiveEntryPayload {
    Many(Vec<TimeEntryDto>),
    One(TimeEntryDto),
}

/// Backend client for `/time-entries`
pub struct TimeEntryClient {
    gateway: Arc<ApiGateway>,
}

impl TimeEntryClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TimeEntryGateway for TimeEntryClient {
    async fn start_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let request = CreateTimeEntryRequest {
            user_id: &entry.user_id,
            project_id: &entry.project_id,
            start_time: entry.start_time,
            description: &entry.description,
            status: entry.status,
        };
        let created: TimeEntryDto = self.gateway.post("/time-entries", &request).await?;
        Ok(created.into_domain())
    }

    async fn pause_entry(&self, id: &str) -> Result<()> {
        self.gateway.put_empty(&format!("/time-entries/{id}/pause")).await?;
        Ok(())
    }

    async fn resume_entry(&self, id: &str) -> Result<()> {
        self.gateway.put_empty(&format!("/time-entries/{id}/resume")).await?;
        Ok(())
    }

    async fn stop_entry(&self, id: &str) -> Result<()> {
        self.gateway.put_empty(&format!("/time-entries/{id}/stop")).await?;
        Ok(())
    }

    async fn active_entry(&self) -> Result<Option<TimeEntry>> {
        let payload: Option<ActiveEntryPayload> = self.gateway.get("/time-entries/active").await?;
        let entry = match payload {
            Some(ActiveEntryPayload::Many(mut entries)) => {
                if entries.is_empty() {
                    None
                } else {
                    Some(entries.remove(0))
                }
            }
            Some(ActiveEntryPayload::One(entry)) => Some(entry),
            None => None,
        };
        Ok(entry.map(TimeEntryDto::into_domain))
    }

    async fn list_entries(&self) -> Result<Vec<TimeEntry>> {
        let entries: Vec<TimeEntryDto> = self.gateway.get("/time-entries").await?;
        Ok(entries.into_iter().map(TimeEntryDto::into_domain).collect())
    }
}
