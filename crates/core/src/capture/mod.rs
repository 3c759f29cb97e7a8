//! Screen-capture coordination

mod coordinator;
pub mod ports;

pub use coordinator::CaptureCoordinator;
pub use ports::{CaptureStream, EntryTagSource, ScreenSource, ScreenshotSink};
