//! Platform screen-capture sources

use std::sync::Arc;

use worklens_core::capture::ScreenSource;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::CoreGraphicsScreenSource;

#[cfg(not(target_os = "macos"))]
mod unsupported;
#[cfg(not(target_os = "macos"))]
pub use unsupported::UnsupportedScreenSource;

/// The screen source for the platform this build targets
pub fn default_screen_source() -> Arc<dyn ScreenSource> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(CoreGraphicsScreenSource::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(UnsupportedScreenSource)
    }
}
