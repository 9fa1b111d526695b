use std::path::PathBuf;

use swiftocr_vision::OcrError;
use thiserror::Error;

/// Every way a single invocation can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to load image.")]
    LoadImage(#[source] std::io::Error),

    #[error("Failed to decode image.")]
    DecodeImage(#[source] OcrError),

    #[error("Failed to read custom words file {}: {source}", path.display())]
    CustomWordsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR failed: {0}")]
    Recognition(#[source] OcrError),

    #[error("No text found.")]
    NoTextFound,

    #[error("Failed to write results: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
