//! # swiftocr
//!
//! Recognizes text in an image and reports each line with its confidence
//! and a pixel bounding box (origin top-left), as JSON.
//!
//! The recognition itself is delegated to an [`OcrEngine`] from
//! `swiftocr-vision`; this crate handles the command line, image loading,
//! the coordinate conversion and the output model.
//!
//! ```ignore
//! use swiftocr::prelude::*;
//!
//! let engine = default_engine()?;
//! let config = OcrConfiguration::new(ImageSource::Path("receipt.png".into()));
//! let results = run(&config, &ResultFilters::default(), engine.as_ref(), tokio::io::empty()).await?;
//! for hit in results.search("total", 0.6, true) {
//!     println!("{} at {:?}", hit.text, hit.bounding_box.top_left());
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod logging;
pub mod results;
pub mod similarity;

pub use app::{execute, recognize_image, run, write_results};
pub use config::{ImageSource, OcrConfiguration, ResultFilters};
pub use error::AppError;
pub use geometry::to_pixel_box;
pub use results::{BoundingBox, OcrResults, RecognizedTextResult};
pub use similarity::ratio;
pub use swiftocr_vision::{
    default_engine, OcrEngine, OcrError, OcrImage, RecognitionLevel, RecognitionOptions,
};

/// Prelude module for convenient imports
///
/// ```ignore
/// use swiftocr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        default_engine, execute, ratio, recognize_image, run, to_pixel_box, write_results,
        AppError, BoundingBox, ImageSource, OcrConfiguration, OcrEngine, OcrError, OcrImage,
        OcrResults, RecognitionLevel, RecognitionOptions, RecognizedTextResult, ResultFilters,
    };
}
