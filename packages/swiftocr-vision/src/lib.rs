//! Text recognition engines for `swiftocr`.
//!
//! Every backend implements [`OcrEngine`] and reports [`Observation`]s in
//! normalized, bottom-left-origin coordinates; turning those into pixel
//! boxes is the caller's job.

pub mod bitmap;
pub mod engine;
pub mod region;
pub mod unsupported;

#[cfg(target_os = "macos")]
pub mod apple;

#[cfg(feature = "ocrs")]
pub mod ocrs_engine;

pub use bitmap::OcrImage;
pub use engine::{OcrEngine, OcrError, RecognitionLevel, RecognitionOptions};
pub use region::{NormalizedRect, Observation};
pub use unsupported::UnsupportedEngine;

#[cfg(target_os = "macos")]
pub use apple::AppleOcrEngine;

#[cfg(feature = "ocrs")]
pub use ocrs_engine::OcrsEngine;

/// The best engine available in this build: Vision on macOS, then `ocrs`
/// when the feature is enabled, otherwise an engine that always fails.
pub fn default_engine() -> Result<Box<dyn OcrEngine>, OcrError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(AppleOcrEngine::new()))
    }
    #[cfg(all(not(target_os = "macos"), feature = "ocrs"))]
    {
        Ok(Box::new(OcrsEngine::new()?))
    }
    #[cfg(all(not(target_os = "macos"), not(feature = "ocrs")))]
    {
        Ok(Box::new(UnsupportedEngine::for_current_platform()))
    }
}
