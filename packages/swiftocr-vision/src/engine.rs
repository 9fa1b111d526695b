use async_trait::async_trait;
use thiserror::Error;

use crate::bitmap::OcrImage;
use crate::region::Observation;

/// Quality/speed tradeoff requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionLevel {
    Fast,
    #[default]
    Accurate,
}

/// Hints passed along with every recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub level: RecognitionLevel,
    /// BCP-47 tags in priority order. Empty means "let the engine decide".
    pub languages: Vec<String>,
    pub auto_detect_language: bool,
    pub language_correction: bool,
    pub custom_words: Vec<String>,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            level: RecognitionLevel::Accurate,
            languages: Vec::new(),
            auto_detect_language: true,
            language_correction: false,
            custom_words: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unsupported(String),
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    EngineError(String),
}

/// A text recognizer. Observations come back in the engine's native
/// coordinate space: unit square, origin at the bottom-left corner.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short backend name, used in diagnostics.
    fn name(&self) -> &'static str;

    async fn recognize(
        &self,
        image: &OcrImage,
        options: &RecognitionOptions,
    ) -> Result<Vec<Observation>, OcrError>;
}
