//! # WorkLens Core
//!
//! Business services and their port interfaces.
//!
//! This crate contains:
//! - Session store with an explicit logout event
//! - Tracker state machine over a backend gateway port
//! - Screen-capture coordinator over platform ports
//! - Project catalog
//! - Dashboard orchestrator tying timer state to capture
//!
//! ## Architecture
//! - Depends only on `worklens-domain`
//! - Infrastructure is injected through the port traits defined here

pub mod capture;
pub mod dashboard;
pub mod projects;
pub mod session;
pub mod tracker;

// Re-export commonly used items
pub use capture::{CaptureCoordinator, CaptureStream, EntryTagSource, ScreenSource, ScreenshotSink};
pub use dashboard::{DashboardService, StartOutcome};
pub use projects::{ProjectCatalog, ProjectsGateway};
pub use session::{SessionEvent, SessionService};
pub use tracker::{Clock, SystemClock, TimeEntryGateway, TrackerService};
