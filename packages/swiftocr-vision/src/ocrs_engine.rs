//! Local recognition with the `ocrs` models, for platforms without Vision.
//!
//! Models are looked up in `$SWIFTOCR_OCRS_MODELS`, then next to the
//! executable (`models/ocrs`, `../share/ocrs`), then in `~/.cache/ocrs`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ocrs::{ImageSource, OcrEngineParams};
use tracing::{debug, warn};

use crate::bitmap::OcrImage;
use crate::engine::{OcrEngine, OcrError, RecognitionOptions};
use crate::region::{NormalizedRect, Observation};

pub const MODELS_DIR_ENV: &str = "SWIFTOCR_OCRS_MODELS";

const DETECTION_MODEL: &str = "text-detection.rten";
const RECOGNITION_MODEL: &str = "text-recognition.rten";

pub struct OcrsEngine {
    engine: Arc<ocrs::OcrEngine>,
}

impl OcrsEngine {
    pub fn new() -> Result<Self, OcrError> {
        let models_dir = Self::find_models_dir()?;
        debug!(dir = %models_dir.display(), "loading ocrs models");

        let load = |name: &str| {
            rten::Model::load_file(models_dir.join(name)).map_err(|e| {
                OcrError::EngineError(format!("failed to load model {name}: {e}"))
            })
        };
        let engine = ocrs::OcrEngine::new(OcrEngineParams {
            detection_model: Some(load(DETECTION_MODEL)?),
            recognition_model: Some(load(RECOGNITION_MODEL)?),
            ..Default::default()
        })
        .map_err(|e| OcrError::EngineError(e.to_string()))?;

        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    fn find_models_dir() -> Result<PathBuf, OcrError> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        [
            std::env::var_os(MODELS_DIR_ENV).map(PathBuf::from),
            exe_dir.clone().map(|p| p.join("models").join("ocrs")),
            exe_dir.and_then(|p| p.parent().map(|p| p.join("share").join("ocrs"))),
            dirs::home_dir().map(|p| p.join(".cache").join("ocrs")),
        ]
        .into_iter()
        .flatten()
        .find(|p| p.join(DETECTION_MODEL).exists())
        .ok_or_else(|| {
            OcrError::Unsupported(format!(
                "ocrs models not found; set {MODELS_DIR_ENV} to a directory containing \
                 {DETECTION_MODEL} and {RECOGNITION_MODEL}"
            ))
        })
    }
}

fn engine_err(e: impl std::fmt::Display) -> OcrError {
    OcrError::EngineError(e.to_string())
}

fn run(engine: &ocrs::OcrEngine, image: &OcrImage) -> Result<Vec<Observation>, OcrError> {
    let rgb = image.to_rgb();
    let source = ImageSource::from_bytes(&rgb, (image.width(), image.height()))
        .map_err(engine_err)?;
    let input = engine.prepare_input(source).map_err(engine_err)?;
    let words = engine.detect_words(&input).map_err(engine_err)?;
    let lines = engine.find_text_lines(&input, &words);

    let mut observations = Vec::new();
    for line in engine
        .recognize_text(&input, &lines)
        .map_err(engine_err)?
        .into_iter()
        .flatten()
    {
        let mut text = String::new();
        let mut bounds = None;
        for c in line.chars() {
            text.push(c.char);
            bounds = Some(match bounds {
                None => c.rect,
                Some(r) => r.union(c.rect),
            });
        }
        let (Some(rect), false) = (bounds, text.trim().is_empty()) else {
            continue;
        };
        observations.push(Observation {
            text: text.trim().to_string(),
            // ocrs does not score its output.
            confidence: 1.0,
            rect: NormalizedRect::from_pixel_rect(
                f64::from(rect.left()),
                f64::from(rect.top()),
                f64::from(rect.width()),
                f64::from(rect.height()),
                image.width(),
                image.height(),
            ),
        });
    }
    Ok(observations)
}

#[async_trait]
impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    async fn recognize(
        &self,
        image: &OcrImage,
        options: &RecognitionOptions,
    ) -> Result<Vec<Observation>, OcrError> {
        if !options.languages.is_empty() || !options.custom_words.is_empty() {
            warn!("ocrs ignores language and custom word hints");
        }
        let engine = Arc::clone(&self.engine);
        let image = image.clone();
        tokio::task::spawn_blocking(move || run(&engine, &image))
            .await
            .map_err(|e| OcrError::EngineError(e.to_string()))?
    }
}
