//! Shared fixtures for integration tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use worklens_core::capture::{CaptureStream, ScreenSource};
use worklens_domain::{ApiConfig, AuthConfig, CaptureConfig, Config, Frame, Result, WorkLensError};

/// Deterministic in-process stand-in for the platform capture stream
pub struct FakeScreenStream {
    stopped: AtomicBool,
    termination: CancellationToken,
}

impl FakeScreenStream {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn revoke(&self) {
        self.termination.cancel();
    }
}

#[async_trait]
impl CaptureStream for FakeScreenStream {
    async fn grab_frame(&self) -> Result<Frame> {
        Ok(Frame { width: 8, height: 4, rgba: vec![0x55; 8 * 4 * 4] })
    }

    fn dimensions(&self) -> (u32, u32) {
        (8, 4)
    }

    fn termination(&self) -> CancellationToken {
        self.termination.clone()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Screen source that hands out [`FakeScreenStream`]s, optionally denying
/// acquisition like a declined permission prompt
#[derive(Default)]
pub struct FakeScreenSource {
    pub deny: AtomicBool,
    pub acquire_calls: AtomicUsize,
    streams: Mutex<Vec<Arc<FakeScreenStream>>>,
}

impl FakeScreenSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_stream(&self) -> Option<Arc<FakeScreenStream>> {
        self.streams.lock().unwrap().last().map(Arc::clone)
    }
}

#[async_trait]
impl ScreenSource for FakeScreenSource {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(WorkLensError::Platform("capture permission denied".into()));
        }
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        let stream = Arc::new(FakeScreenStream {
            stopped: AtomicBool::new(false),
            termination: CancellationToken::new(),
        });
        self.streams.lock().unwrap().push(Arc::clone(&stream));
        Ok(stream)
    }
}

/// App configuration pointed at a mock backend, with a capture cadence
/// short enough for tests
pub fn test_config(origin: &str) -> Config {
    Config {
        api: ApiConfig { origin: origin.to_string(), timeout_seconds: 5 },
        capture: CaptureConfig {
            interval_seconds: 3600,
            initial_delay_seconds: 1,
            jpeg_quality: 60,
            enabled: true,
        },
        auth: AuthConfig::default(),
    }
}

/// Canonical login/registration response body
pub fn auth_response_json() -> serde_json::Value {
    serde_json::json!({
        "access_token": "acc-1",
        "refresh_token": "ref-1",
        "user": {
            "id": "u1",
            "name": "Dana Fox",
            "email": "dana@example.com",
            "role": "MEMBER",
            "companyId": "c1"
        }
    })
}

pub fn project_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "name": name, "status": "ACTIVE" })
}

pub fn running_entry_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "projectId": "p1",
        "status": "RUNNING",
        "timeInterval": { "start": "2024-01-01T09:00:00Z" }
    })
}
