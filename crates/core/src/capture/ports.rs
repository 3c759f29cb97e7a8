//! Port interfaces for screen capture
//!
//! These traits define the boundaries between the capture coordinator
//! and the platform/backend implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use worklens_domain::{Frame, NewScreenshot, Result, Screenshot};

/// Trait for acquiring a display-capture stream from the platform.
///
/// Acquisition may block on an OS permission prompt; a denial is an error,
/// which the coordinator converts into a plain `false` result.
#[async_trait]
pub trait ScreenSource: Send + Sync {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>>;
}

/// A live display-capture stream.
#[async_trait]
pub trait CaptureStream: Send + Sync {
    /// Grab the current frame at the display's native resolution
    async fn grab_frame(&self) -> Result<Frame>;

    /// Current frame dimensions; (0, 0) until the stream delivers frames
    fn dimensions(&self) -> (u32, u32);

    /// Token cancelled when the platform revokes the stream out from under
    /// us (the user ended sharing, the display went away)
    fn termination(&self) -> CancellationToken;

    /// Stop every track and release platform resources; idempotent
    fn stop(&self);
}

/// Trait for uploading captured screenshots
#[async_trait]
pub trait ScreenshotSink: Send + Sync {
    async fn upload(&self, screenshot: NewScreenshot) -> Result<Screenshot>;
}

/// Supplies the time-entry id screenshots are tagged with
pub trait EntryTagSource: Send + Sync {
    fn current_entry_id(&self) -> Option<String>;
}
