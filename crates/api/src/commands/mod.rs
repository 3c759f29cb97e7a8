//! Command functions invoked by a UI shell

mod auth;
mod projects;
mod screenshots;
mod tracker;

pub use auth::{login, logout, register};
pub use projects::{create_project, list_projects, select_project};
pub use screenshots::recent_screenshots;
pub use tracker::{
    display_seconds, pause_timer, restore_tracker, resume_timer, start_timer, stop_timer,
    tracker_state,
};
