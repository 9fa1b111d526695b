//! The recognition pipeline: load, recognize, convert, filter, print.
use std::io::Write;

use swiftocr_vision::{OcrEngine, OcrError, OcrImage};
use tokio::io::AsyncRead;
use tracing::debug;

use crate::cli::Args;
use crate::config::{OcrConfiguration, ResultFilters};
use crate::error::{AppError, Result};
use crate::loader;
use crate::results::{OcrResults, RecognizedTextResult};

/// Recognizes text in an already decoded image.
pub async fn recognize_image(
    image: &OcrImage,
    config: &OcrConfiguration,
    filters: &ResultFilters,
    engine: &dyn OcrEngine,
) -> Result<OcrResults> {
    debug!(
        engine = engine.name(),
        width = image.width(),
        height = image.height(),
        "recognizing text"
    );
    let observations = engine
        .recognize(image, &config.recognition)
        .await
        .map_err(AppError::Recognition)?;
    debug!(count = observations.len(), "engine returned observations");

    let results: OcrResults = observations
        .iter()
        .map(|o| RecognizedTextResult::from_observation(o, image.width(), image.height()))
        .collect();

    let results = filters.apply(results);
    if results.is_empty() {
        return Err(AppError::NoTextFound);
    }
    Ok(results)
}

/// Loads the configured image and recognizes its text.
pub async fn run<R>(
    config: &OcrConfiguration,
    filters: &ResultFilters,
    engine: &dyn OcrEngine,
    stdin: R,
) -> Result<OcrResults>
where
    R: AsyncRead + Unpin,
{
    let image = loader::load_image(&config.source, stdin).await?;
    recognize_image(&image, config, filters, engine).await
}

pub fn write_results<W: Write>(results: &OcrResults, compact: bool, mut out: W) -> Result<()> {
    let json = results.to_json(!compact)?;
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}

/// Runs one full invocation for the parsed `args`.
///
/// The engine is only built once the image has been read and decoded, so
/// input errors are reported even where no engine can be created.
pub async fn execute<F, R, W>(args: &Args, make_engine: F, stdin: R, stdout: W) -> Result<()>
where
    F: FnOnce() -> std::result::Result<Box<dyn OcrEngine>, OcrError>,
    R: AsyncRead + Unpin,
    W: Write,
{
    let config = OcrConfiguration::from_args(args).await?;
    let filters = ResultFilters::from_args(args);

    let image = loader::load_image(&config.source, stdin).await?;
    let engine = make_engine().map_err(AppError::Recognition)?;
    let results = recognize_image(&image, &config, &filters, engine.as_ref()).await?;

    debug!(count = results.len(), "writing results");
    write_results(&results, args.compact, stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use swiftocr_vision::{NormalizedRect, Observation, RecognitionLevel, RecognitionOptions};

    use crate::results::BoundingBox;

    /// Engine returning canned observations and remembering the options it saw.
    struct FakeEngine {
        observations: Vec<Observation>,
        seen: Mutex<Option<RecognitionOptions>>,
    }

    impl FakeEngine {
        fn new(observations: Vec<Observation>) -> Self {
            Self {
                observations,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl OcrEngine for FakeEngine {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn recognize(
            &self,
            _image: &OcrImage,
            options: &RecognitionOptions,
        ) -> std::result::Result<Vec<Observation>, OcrError> {
            *self.seen.lock().unwrap() = Some(options.clone());
            Ok(self.observations.clone())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl OcrEngine for FailingEngine {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn recognize(
            &self,
            _image: &OcrImage,
            _options: &RecognitionOptions,
        ) -> std::result::Result<Vec<Observation>, OcrError> {
            Err(OcrError::EngineError("request was cancelled".into()))
        }
    }

    fn observation(text: &str, confidence: f32, rect: [f64; 4]) -> Observation {
        Observation {
            text: text.into(),
            confidence,
            rect: NormalizedRect::new(rect[0], rect[1], rect[2], rect[3]),
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("swiftocr").chain(argv.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn converts_observations_to_pixel_boxes() {
        let engine = FakeEngine::new(vec![
            observation("Top line", 0.9, [0.1, 0.8, 0.5, 0.1]),
            observation("Bottom line", 0.5, [0.0, 0.0, 1.0, 0.25]),
        ]);
        let config = OcrConfiguration::new(crate::ImageSource::Stdin);
        let bytes = png(200, 100);

        let results = run(&config, &ResultFilters::default(), &engine, &bytes[..])
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results.get(0).unwrap().bounding_box, BoundingBox::new(20, 10, 100, 10));
        assert_eq!(results.get(1).unwrap().bounding_box, BoundingBox::new(0, 75, 200, 25));
        for r in &results {
            assert!(r.bounding_box.bottom() <= 100);
            assert!(r.bounding_box.right() <= 200);
        }
    }

    #[tokio::test]
    async fn empty_recognition_is_no_text_found() {
        let engine = FakeEngine::new(Vec::new());
        let config = OcrConfiguration::new(crate::ImageSource::Stdin);
        let bytes = png(10, 10);

        let err = run(&config, &ResultFilters::default(), &engine, &bytes[..])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoTextFound));
        assert_eq!(err.to_string(), "No text found.");
    }

    #[tokio::test]
    async fn filtering_everything_out_is_no_text_found() {
        let engine = FakeEngine::new(vec![observation("faint", 0.2, [0.0, 0.0, 0.5, 0.5])]);
        let config = OcrConfiguration::new(crate::ImageSource::Stdin);
        let filters = ResultFilters {
            min_confidence: Some(0.5),
            ..Default::default()
        };
        let bytes = png(10, 10);

        let err = run(&config, &filters, &engine, &bytes[..]).await.unwrap_err();
        assert!(matches!(err, AppError::NoTextFound));
    }

    #[tokio::test]
    async fn engine_errors_are_reported() {
        let config = OcrConfiguration::new(crate::ImageSource::Stdin);
        let bytes = png(10, 10);

        let err = run(&config, &ResultFilters::default(), &FailingEngine, &bytes[..])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "OCR failed: engine error: request was cancelled");
    }

    #[tokio::test]
    async fn execute_passes_options_and_prints_json() {
        let engine = Arc::new(FakeEngine::new(vec![observation(
            "Hello",
            0.5,
            [0.0, 0.5, 0.5, 0.5],
        )]));
        let handle = Arc::clone(&engine);
        let bytes = png(40, 20);
        let mut stdout = Vec::new();

        execute(
            &args(&["-", "--fast", "--languages", "en-US,de-DE", "--custom-words", "Hello"]),
            move || Ok(Box::new(ArcEngine(handle)) as Box<dyn OcrEngine>),
            &bytes[..],
            &mut stdout,
        )
        .await
        .unwrap();

        let options = engine.seen.lock().unwrap().clone().unwrap();
        assert_eq!(options.level, RecognitionLevel::Fast);
        assert_eq!(options.languages, vec!["en-US", "de-DE"]);
        assert!(!options.auto_detect_language);
        assert_eq!(options.custom_words, vec!["Hello"]);

        let printed = String::from_utf8(stdout).unwrap();
        assert!(printed.ends_with("]\n"));
        let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "text": "Hello",
                "confidence": 0.5,
                "boundingBox": { "x": 0, "y": 0, "width": 20, "height": 10 }
            }])
        );
    }

    #[tokio::test]
    async fn execute_compact_output_is_one_line() {
        let bytes = png(10, 10);
        let mut stdout = Vec::new();
        execute(
            &args(&["-", "--compact"]),
            || {
                Ok(Box::new(FakeEngine::new(vec![observation("a", 1.0, [0.0, 0.0, 1.0, 1.0])]))
                    as Box<dyn OcrEngine>)
            },
            &bytes[..],
            &mut stdout,
        )
        .await
        .unwrap();
        let printed = String::from_utf8(stdout).unwrap();
        assert_eq!(printed.lines().count(), 1);
    }

    #[tokio::test]
    async fn execute_reports_load_errors_before_building_the_engine() {
        let mut stdout = Vec::new();
        let err = execute(
            &args(&["/nonexistent/swiftocr/scan.png"]),
            || panic!("engine must not be built"),
            tokio::io::empty(),
            &mut stdout,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load image.");
        assert!(stdout.is_empty());
    }

    /// Lets a test keep a handle on the engine it hands to `execute`.
    struct ArcEngine(Arc<FakeEngine>);

    #[async_trait]
    impl OcrEngine for ArcEngine {
        fn name(&self) -> &'static str {
            self.0.name()
        }

        async fn recognize(
            &self,
            image: &OcrImage,
            options: &RecognitionOptions,
        ) -> std::result::Result<Vec<Observation>, OcrError> {
            self.0.recognize(image, options).await
        }
    }
}
