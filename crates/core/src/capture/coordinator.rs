//! Screen-capture coordinator
//!
//! Owns the single capture stream and the periodic snapshot task. The task
//! is an explicitly cancellable unit with one owner: starting spawns it,
//! stopping cancels it, and platform-side revocation is surfaced to
//! subscribers through a notification channel so the orchestrator can react
//! (e.g. stop the backend timer).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use worklens_domain::{CaptureConfig, Frame, NewScreenshot, Result, WorkLensError};

use super::ports::{CaptureStream, EntryTagSource, ScreenSource, ScreenshotSink};
use crate::tracker::Clock;

struct ActiveCapture {
    stream: Arc<dyn CaptureStream>,
    cancel: CancellationToken,
}

/// Everything the snapshot loop needs, detached from the coordinator
struct SnapshotContext {
    stream: Arc<dyn CaptureStream>,
    sink: Arc<dyn ScreenshotSink>,
    tags: Arc<dyn EntryTagSource>,
    clock: Arc<dyn Clock>,
    jpeg_quality: u8,
}

/// Coordinates stream acquisition and periodic screenshot uploads
pub struct CaptureCoordinator {
    source: Arc<dyn ScreenSource>,
    sink: Arc<dyn ScreenshotSink>,
    tags: Arc<dyn EntryTagSource>,
    clock: Arc<dyn Clock>,
    initial_delay: Duration,
    interval: Duration,
    jpeg_quality: u8,
    enabled: bool,
    // Shared with the termination watcher so a revocation can clear it
    active: Arc<Mutex<Option<ActiveCapture>>>,
    requesting: AtomicBool,
    revocations: broadcast::Sender<()>,
}

impl CaptureCoordinator {
    pub fn new(
        source: Arc<dyn ScreenSource>,
        sink: Arc<dyn ScreenshotSink>,
        tags: Arc<dyn EntryTagSource>,
        clock: Arc<dyn Clock>,
        config: &CaptureConfig,
    ) -> Self {
        let (revocations, _) = broadcast::channel(8);
        Self {
            source,
            sink,
            tags,
            clock,
            initial_delay: Duration::from_secs(config.initial_delay_seconds),
            interval: Duration::from_secs(config.interval_seconds),
            jpeg_quality: config.jpeg_quality,
            enabled: config.enabled,
            active: Arc::new(Mutex::new(None)),
            requesting: AtomicBool::new(false),
            revocations,
        }
    }

    /// Override the snapshot cadence; used by tests and specialised setups
    pub fn with_timing(mut self, initial_delay: Duration, interval: Duration) -> Self {
        self.initial_delay = initial_delay;
        self.interval = interval;
        self
    }

    /// Whether a stream is currently held
    pub fn is_tracking(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Subscribe to platform-side termination notifications
    pub fn subscribe_revocations(&self) -> broadcast::Receiver<()> {
        self.revocations.subscribe()
    }

    /// Acquire the capture stream and start the snapshot task.
    ///
    /// Returns whether capture is active after the call. Never propagates an
    /// error: a declined or failed acquisition yields `false`. A call while
    /// already tracking, or while another acquisition request is pending, is
    /// treated as satisfied and returns `true` without prompting again. With
    /// capture disabled in configuration the requirement is vacuously met.
    pub async fn start_tracking(&self) -> bool {
        if !self.enabled {
            debug!("screen capture disabled by configuration");
            return true;
        }
        if self.is_tracking() {
            return true;
        }
        if self.requesting.swap(true, Ordering::SeqCst) {
            return true;
        }

        let stream = match self.source.acquire().await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "screen capture acquisition failed");
                self.requesting.store(false, Ordering::SeqCst);
                return false;
            }
        };

        let cancel = CancellationToken::new();
        let context = SnapshotContext {
            stream: Arc::clone(&stream),
            sink: Arc::clone(&self.sink),
            tags: Arc::clone(&self.tags),
            clock: Arc::clone(&self.clock),
            jpeg_quality: self.jpeg_quality,
        };
        let initial_delay = self.initial_delay;
        let interval = self.interval;
        let loop_cancel = cancel.clone();
        tokio::spawn(async move {
            Self::snapshot_loop(context, initial_delay, interval, loop_cancel).await;
        });

        // Watch for the platform revoking the stream out from under us
        let termination = stream.termination();
        let watcher_cancel = cancel.clone();
        let active_slot = Arc::clone(&self.active);
        let revocations = self.revocations.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = watcher_cancel.cancelled() => {}
                _ = termination.cancelled() => {
                    warn!("screen capture revoked by the platform");
                    if let Some(active) = active_slot.lock().take() {
                        active.cancel.cancel();
                        active.stream.stop();
                    }
                    let _ = revocations.send(());
                }
            }
        });

        *self.active.lock() = Some(ActiveCapture { stream, cancel });
        self.requesting.store(false, Ordering::SeqCst);
        info!("screen capture started");
        true
    }

    /// Stop capture: cancel pending snapshot timers, stop every track, and
    /// release the stream. Safe to call when already stopped. An upload
    /// already in flight is left to finish or fail on its own.
    pub fn stop_tracking(&self) {
        let active = self.active.lock().take();
        if let Some(active) = active {
            active.cancel.cancel();
            active.stream.stop();
            info!("screen capture stopped");
        }
    }

    /// Capture and upload a single screenshot now.
    ///
    /// No-op without an active stream; the per-frame guards in
    /// [`Self::capture_once`] also skip when no time entry is active or the
    /// stream has no frame yet.
    pub async fn take_screenshot(&self) {
        let stream = self.active.lock().as_ref().map(|active| Arc::clone(&active.stream));
        let Some(stream) = stream else {
            debug!("screenshot skipped: capture not active");
            return;
        };
        let context = SnapshotContext {
            stream,
            sink: Arc::clone(&self.sink),
            tags: Arc::clone(&self.tags),
            clock: Arc::clone(&self.clock),
            jpeg_quality: self.jpeg_quality,
        };
        Self::capture_once(&context).await;
    }

    async fn snapshot_loop(
        context: SnapshotContext,
        initial_delay: Duration,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        // Short grace period so the stream renders its first frame
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(initial_delay) => {}
        }

        loop {
            Self::capture_once(&context).await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("snapshot loop cancelled");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn capture_once(context: &SnapshotContext) {
        let Some(entry_id) = context.tags.current_entry_id() else {
            debug!("screenshot skipped: no active time entry");
            return;
        };

        let (width, height) = context.stream.dimensions();
        if width == 0 || height == 0 {
            debug!("screenshot skipped: stream has no frame yet");
            return;
        }

        let frame = match context.stream.grab_frame().await {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "failed to grab frame");
                return;
            }
        };

        let image_base64 = match encode_frame(frame, context.jpeg_quality) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "failed to encode frame");
                return;
            }
        };

        let screenshot = NewScreenshot {
            time_entry_id: entry_id.clone(),
            image_base64,
            captured_at: context.clock.now(),
        };

        // Best-effort telemetry: failures are logged, never retried
        match context.sink.upload(screenshot).await {
            Ok(stored) => debug!(entry_id = %entry_id, screenshot_id = %stored.id, "screenshot uploaded"),
            Err(err) => warn!(entry_id = %entry_id, error = %err, "screenshot upload failed"),
        }
    }
}

/// Cancel the snapshot task if the coordinator is dropped mid-capture
impl Drop for CaptureCoordinator {
    fn drop(&mut self) {
        if let Some(active) = self.active.lock().take() {
            warn!("capture coordinator dropped while tracking; cancelling");
            active.cancel.cancel();
            active.stream.stop();
        }
    }
}

/// Encode a raw RGBA frame as base64 JPEG at the given quality
fn encode_frame(frame: Frame, quality: u8) -> Result<String> {
    let width = frame.width;
    let height = frame.height;
    let rgba = image::RgbaImage::from_raw(width, height, frame.rgba)
        .ok_or_else(|| WorkLensError::Internal("frame buffer does not match its dimensions".into()))?;
    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut jpeg = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder
        .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|err| WorkLensError::Internal(format!("jpeg encoding failed: {err}")))?;

    Ok(base64::engine::general_purpose::STANDARD.encode(&jpeg))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Notify;
    use worklens_domain::Screenshot;

    use super::*;

    struct FakeStream {
        width: u32,
        height: u32,
        stopped: AtomicBool,
        termination: CancellationToken,
    }

    impl FakeStream {
        fn with_dimensions(width: u32, height: u32) -> Arc<Self> {
            Arc::new(Self {
                width,
                height,
                stopped: AtomicBool::new(false),
                termination: CancellationToken::new(),
            })
        }

        fn is_stopped(&self) -> bool {
            self.stopped.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaptureStream for FakeStream {
        async fn grab_frame(&self) -> Result<Frame> {
            Ok(Frame {
                width: self.width,
                height: self.height,
                rgba: vec![0x7F; (self.width * self.height * 4) as usize],
            })
        }

        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn termination(&self) -> CancellationToken {
            self.termination.clone()
        }

        fn stop(&self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct FakeSource {
        acquire_calls: AtomicUsize,
        streams: Mutex<Vec<Arc<FakeStream>>>,
        deny: AtomicBool,
        gate: Option<Arc<Notify>>,
        frame_size: Mutex<(u32, u32)>,
    }

    impl FakeSource {
        fn sized(width: u32, height: u32) -> Arc<Self> {
            let source = Self::default();
            *source.frame_size.lock() = (width, height);
            Arc::new(source)
        }

        fn gated(width: u32, height: u32, gate: Arc<Notify>) -> Arc<Self> {
            let mut source = Self::default();
            source.gate = Some(gate);
            *source.frame_size.lock() = (width, height);
            Arc::new(source)
        }

        fn last_stream(&self) -> Arc<FakeStream> {
            Arc::clone(self.streams.lock().last().unwrap())
        }
    }

    #[async_trait]
    impl ScreenSource for FakeSource {
        async fn acquire(&self) -> Result<Arc<dyn CaptureStream>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.deny.load(Ordering::SeqCst) {
                return Err(WorkLensError::Platform("capture permission denied".into()));
            }
            self.acquire_calls.fetch_add(1, Ordering::SeqCst);
            let (width, height) = *self.frame_size.lock();
            let stream = FakeStream::with_dimensions(width, height);
            self.streams.lock().push(Arc::clone(&stream));
            Ok(stream)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        uploads: Mutex<Vec<NewScreenshot>>,
    }

    impl RecordingSink {
        fn upload_count(&self) -> usize {
            self.uploads.lock().len()
        }
    }

    #[async_trait]
    impl ScreenshotSink for RecordingSink {
        async fn upload(&self, screenshot: NewScreenshot) -> Result<Screenshot> {
            let stored = Screenshot {
                id: format!("s{}", self.uploads.lock().len()),
                time_entry_id: screenshot.time_entry_id.clone(),
                image_url: "/shots/s.jpg".into(),
                thumbnail_url: None,
                timestamp: screenshot.captured_at,
            };
            self.uploads.lock().push(screenshot);
            Ok(stored)
        }
    }

    #[derive(Default)]
    struct StaticTags {
        entry_id: Mutex<Option<String>>,
    }

    impl StaticTags {
        fn tagged(id: &str) -> Arc<Self> {
            let tags = Self::default();
            *tags.entry_id.lock() = Some(id.to_string());
            Arc::new(tags)
        }
    }

    impl EntryTagSource for StaticTags {
        fn current_entry_id(&self) -> Option<String> {
            self.entry_id.lock().clone()
        }
    }

    struct TestClock;

    impl Clock for TestClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            Utc::now()
        }
    }

    fn coordinator(
        source: Arc<FakeSource>,
        sink: Arc<RecordingSink>,
        tags: Arc<StaticTags>,
    ) -> Arc<CaptureCoordinator> {
        Arc::new(
            CaptureCoordinator::new(source, sink, tags, Arc::new(TestClock), &CaptureConfig::default())
                // Keep the periodic task quiet unless a test opts in
                .with_timing(Duration::from_secs(3600), Duration::from_secs(3600)),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_then_start_leaves_exactly_one_live_stream() {
        let source = FakeSource::sized(4, 2);
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));

        assert!(coordinator.start_tracking().await);
        let first = source.last_stream();

        coordinator.stop_tracking();
        assert!(first.is_stopped(), "prior stream tracks must be stopped");
        assert!(!coordinator.is_tracking());

        assert!(coordinator.start_tracking().await);
        let second = source.last_stream();
        assert!(!second.is_stopped());
        assert_eq!(source.acquire_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn start_while_tracking_does_not_reprompt() {
        let source = FakeSource::sized(4, 2);
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));

        assert!(coordinator.start_tracking().await);
        assert!(coordinator.start_tracking().await);
        assert_eq!(source.acquire_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_request_is_treated_as_satisfied() {
        let gate = Arc::new(Notify::new());
        let source = FakeSource::gated(4, 2, Arc::clone(&gate));
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));

        let pending = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.start_tracking().await })
        };
        // Let the first request reach the acquisition await
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Second call while the prompt is pending resolves immediately
        assert!(coordinator.start_tracking().await);

        gate.notify_one();
        assert!(pending.await.unwrap());
        assert_eq!(source.acquire_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn denied_acquisition_returns_false() {
        let source = FakeSource::sized(4, 2);
        source.deny.store(true, Ordering::SeqCst);
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));

        assert!(!coordinator.start_tracking().await);
        assert!(!coordinator.is_tracking());

        // The request lock must be released so the user can try again
        source.deny.store(false, Ordering::SeqCst);
        assert!(coordinator.start_tracking().await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn screenshot_skipped_without_entry_id() {
        let source = FakeSource::sized(4, 2);
        let sink = Arc::new(RecordingSink::default());
        let coordinator =
            coordinator(Arc::clone(&source), Arc::clone(&sink), Arc::new(StaticTags::default()));

        assert!(coordinator.start_tracking().await);
        coordinator.take_screenshot().await;

        assert_eq!(sink.upload_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn screenshot_skipped_with_zero_dimensions() {
        let source = FakeSource::sized(0, 0);
        let sink = Arc::new(RecordingSink::default());
        let coordinator = coordinator(Arc::clone(&source), Arc::clone(&sink), StaticTags::tagged("t1"));

        assert!(coordinator.start_tracking().await);
        coordinator.take_screenshot().await;

        assert_eq!(sink.upload_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn periodic_capture_uploads_tagged_frames() {
        let source = FakeSource::sized(4, 2);
        let sink = Arc::new(RecordingSink::default());
        let coordinator = Arc::new(
            CaptureCoordinator::new(
                source,
                sink.clone(),
                StaticTags::tagged("t1"),
                Arc::new(TestClock),
                &CaptureConfig::default(),
            )
            .with_timing(Duration::from_millis(10), Duration::from_secs(3600)),
        );

        assert!(coordinator.start_tracking().await);
        tokio::time::sleep(Duration::from_millis(150)).await;
        coordinator.stop_tracking();

        assert_eq!(sink.upload_count(), 1, "one capture after the initial delay");
        let uploads = sink.uploads.lock();
        assert_eq!(uploads[0].time_entry_id, "t1");
        assert!(!uploads[0].image_base64.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn revocation_stops_capture_and_notifies() {
        let source = FakeSource::sized(4, 2);
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));
        let mut revocations = coordinator.subscribe_revocations();

        assert!(coordinator.start_tracking().await);
        let stream = source.last_stream();

        stream.termination.cancel();
        tokio::time::timeout(Duration::from_secs(1), revocations.recv())
            .await
            .expect("revocation must be published")
            .unwrap();

        assert!(!coordinator.is_tracking());
        assert!(stream.is_stopped());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn disabled_capture_is_vacuously_satisfied() {
        let source = FakeSource::sized(4, 2);
        let config = CaptureConfig { enabled: false, ..CaptureConfig::default() };
        let coordinator = Arc::new(CaptureCoordinator::new(
            Arc::clone(&source) as Arc<dyn ScreenSource>,
            Arc::new(RecordingSink::default()),
            StaticTags::tagged("t1"),
            Arc::new(TestClock),
            &config,
        ));

        assert!(coordinator.start_tracking().await);
        assert!(!coordinator.is_tracking());
        assert_eq!(source.acquire_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_tracking_is_idempotent() {
        let source = FakeSource::sized(4, 2);
        let coordinator =
            coordinator(Arc::clone(&source), Arc::new(RecordingSink::default()), StaticTags::tagged("t1"));

        coordinator.stop_tracking();

        assert!(coordinator.start_tracking().await);
        coordinator.stop_tracking();
        coordinator.stop_tracking();
        assert!(!coordinator.is_tracking());
    }

    #[test]
    fn encode_frame_produces_base64_jpeg() {
        let frame = Frame { width: 2, height: 2, rgba: vec![0xFF; 16] };
        let encoded = encode_frame(frame, 60).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn encode_frame_rejects_mismatched_buffer() {
        let frame = Frame { width: 4, height: 4, rgba: vec![0xFF; 3] };
        assert!(encode_frame(frame, 60).is_err());
    }
}
