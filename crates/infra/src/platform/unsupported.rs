//! Fallback source for platforms without a capture implementation
//!
//! Acquisition always fails, which the coordinator reports as a plain
//! `false`; the timer still works, just without screenshots.

use std::sync::Arc;

use async_trait::async_trait;
use worklens_core::capture::{CaptureStream, ScreenSource};
use worklens_domain::{Result, WorkLensError};

pub struct UnsupportedScreenSource;

#[async_trait]
impl ScreenSource for UnsupportedScreenSource {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>> {
        Err(WorkLensError::Platform(
            "screen capture is not supported on this platform".into(),
        ))
    }
}
