//! Dashboard orchestration

mod service;

pub use service::{DashboardService, StartOutcome};
