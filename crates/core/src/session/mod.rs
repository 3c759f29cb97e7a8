//! Session state and lifecycle events

mod service;

pub use service::{SessionEvent, SessionService};
