use async_trait::async_trait;

use crate::bitmap::OcrImage;
use crate::engine::{OcrEngine, OcrError, RecognitionOptions};
use crate::region::Observation;

/// Stand-in used when the build has no recognition backend for its target.
pub struct UnsupportedEngine {
    reason: String,
}

impl UnsupportedEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn for_current_platform() -> Self {
        Self::new(format!(
            "no text recognition backend is built for {}; \
             rebuild with `--features ocrs` or run on macOS",
            std::env::consts::OS
        ))
    }
}

#[async_trait]
impl OcrEngine for UnsupportedEngine {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    async fn recognize(
        &self,
        _image: &OcrImage,
        _options: &RecognitionOptions,
    ) -> Result<Vec<Observation>, OcrError> {
        Err(OcrError::Unsupported(self.reason.clone()))
    }
}
