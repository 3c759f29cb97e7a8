//! Session store with an explicit logout event
//!
//! Other components subscribe to session events instead of reaching into the
//! session directly, so reset-on-logout is wiring, not a cross-import.

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::info;
use worklens_domain::{Session, User};

/// Events published by the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedOut,
}

/// Holds the current user identity and authentication flag
pub struct SessionService {
    state: Mutex<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionService {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self { state: Mutex::new(Session::default()), events }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.lock().clone()
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<User> {
        self.state.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().is_authenticated
    }

    /// Record a successful login or registration
    pub fn set_user(&self, user: User) {
        let mut state = self.state.lock();
        info!(user_id = %user.id, "session established");
        state.is_authenticated = true;
        state.user = Some(user);
    }

    /// Clear the session and notify subscribers
    pub fn logout(&self) {
        {
            let mut state = self.state.lock();
            state.user = None;
            state.is_authenticated = false;
        }
        info!("session cleared");
        // No receivers is fine; nothing depends on delivery
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}
