//! macOS screen capture via CoreGraphics
//!
//! Captures the main display with `CGDisplay`. Acquisition probes one frame
//! so a missing screen-recording permission surfaces at prompt time rather
//! than silently producing empty captures. Frames arrive as BGRA with row
//! padding and are repacked into tight RGBA for the encoder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use core_graphics::display::CGDisplay;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use worklens_core::capture::{CaptureStream, ScreenSource};
use worklens_domain::{Frame, Result, WorkLensError};

pub struct CoreGraphicsScreenSource;

impl CoreGraphicsScreenSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoreGraphicsScreenSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenSource for CoreGraphicsScreenSource {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>> {
        let display_id = CGDisplay::main().id;

        // Probe one frame so permission problems fail the acquisition
        tokio::task::spawn_blocking(move || grab_rgba(display_id).map(|_| ()))
            .await
            .map_err(|err| WorkLensError::Internal(format!("capture probe task failed: {err}")))??;

        debug!(display_id, "display capture acquired");
        Ok(Arc::new(DisplayStream {
            display_id,
            stopped: AtomicBool::new(false),
            termination: CancellationToken::new(),
        }))
    }
}

struct DisplayStream {
    display_id: u32,
    stopped: AtomicBool,
    termination: CancellationToken,
}

#[async_trait]
impl CaptureStream for DisplayStream {
    async fn grab_frame(&self) -> Result<Frame> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(WorkLensError::Platform("capture stream is stopped".into()));
        }

        let display_id = self.display_id;
        let result = tokio::task::spawn_blocking(move || grab_rgba(display_id))
            .await
            .map_err(|err| WorkLensError::Internal(format!("capture task failed: {err}")))?;

        if result.is_err() && !display_is_active(self.display_id) {
            // The display went away; treat it like the platform revoking us
            self.termination.cancel();
        }
        result
    }

    fn dimensions(&self) -> (u32, u32) {
        if self.stopped.load(Ordering::SeqCst) {
            return (0, 0);
        }
        let display = CGDisplay::new(self.display_id);
        (display.pixels_wide() as u32, display.pixels_high() as u32)
    }

    fn termination(&self) -> CancellationToken {
        self.termination.clone()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

fn display_is_active(display_id: u32) -> bool {
    CGDisplay::active_displays()
        .map(|displays| displays.contains(&display_id))
        .unwrap_or(false)
}

/// Capture the display and repack BGRA rows into tight RGBA
fn grab_rgba(display_id: u32) -> Result<Frame> {
    let display = CGDisplay::new(display_id);
    let image = display.image().ok_or_else(|| {
        WorkLensError::Platform(
            "display image unavailable (missing screen-recording permission?)".into(),
        )
    })?;

    let width = image.width() as usize;
    let height = image.height() as usize;
    let bytes_per_row = image.bytes_per_row();
    let bytes_per_pixel = (image.bits_per_pixel() / 8).max(1);
    let data = image.data();
    let source = data.bytes();

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        let row_start = row * bytes_per_row;
        for col in 0..width {
            let offset = row_start + col * bytes_per_pixel;
            if offset + 3 >= source.len() {
                return Err(WorkLensError::Platform("capture buffer is truncated".into()));
            }
            let b = source[offset];
            let g = source[offset + 1];
            let r = source[offset + 2];
            rgba.extend_from_slice(&[r, g, b, 0xFF]);
        }
    }

    Ok(Frame { width: width as u32, height: height as u32, rgba })
}
