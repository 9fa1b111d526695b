use async_trait::async_trait;
use tracing::debug;

use crate::bitmap::OcrImage;
use crate::engine::{OcrEngine, OcrError, RecognitionOptions};
use crate::region::Observation;

use super::ffi;

/// `VNRecognizeTextRequest` behind the [`OcrEngine`] trait.
pub struct AppleOcrEngine;

impl AppleOcrEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AppleOcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for AppleOcrEngine {
    fn name(&self) -> &'static str {
        "apple-vision"
    }

    async fn recognize(
        &self,
        image: &OcrImage,
        options: &RecognitionOptions,
    ) -> Result<Vec<Observation>, OcrError> {
        debug!(
            level = ?options.level,
            languages = ?options.languages,
            auto_detect = options.auto_detect_language,
            correction = options.language_correction,
            custom_words = options.custom_words.len(),
            "submitting Vision text request"
        );
        let image = image.clone();
        let options = options.clone();
        let observations =
            tokio::task::spawn_blocking(move || ffi::recognize(&image, &options))
                .await
                .map_err(|e| OcrError::EngineError(e.to_string()))??;
        debug!(count = observations.len(), "Vision request finished");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> Option<Vec<u8>> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name);
        if !path.exists() {
            eprintln!("skipping test: {name} not found");
            return None;
        }
        Some(std::fs::read(&path).unwrap())
    }

    #[tokio::test]
    async fn test_recognize_image() {
        let Some(bytes) = fixture("test_sample.png") else {
            return;
        };
        let image = OcrImage::decode(&bytes).unwrap();
        let engine = AppleOcrEngine::new();
        let observations = engine
            .recognize(&image, &RecognitionOptions::default())
            .await
            .unwrap();
        for o in &observations {
            println!("  [{:.2}] {} {:?}", o.confidence, o.text, o.rect);
        }
        assert!(!observations.is_empty(), "expected some text from image");
        for o in &observations {
            assert!((0.0..=1.0).contains(&o.confidence));
        }
    }

    #[tokio::test]
    async fn test_recognize_image_fast_with_hints() {
        let Some(bytes) = fixture("test_sample.png") else {
            return;
        };
        let image = OcrImage::decode(&bytes).unwrap();
        let options = RecognitionOptions {
            level: crate::RecognitionLevel::Fast,
            languages: vec!["en-US".into()],
            auto_detect_language: false,
            language_correction: true,
            custom_words: vec!["swiftocr".into()],
        };
        let observations = AppleOcrEngine::new()
            .recognize(&image, &options)
            .await
            .unwrap();
        assert!(!observations.is_empty(), "expected some text from image");
    }

    #[tokio::test]
    async fn test_blank_image_has_no_text() {
        let image = OcrImage::from_rgba(64, 64, vec![255; 64 * 64 * 4]).unwrap();
        let observations = AppleOcrEngine::new()
            .recognize(&image, &RecognitionOptions::default())
            .await
            .unwrap();
        assert!(observations.is_empty());
    }
}
