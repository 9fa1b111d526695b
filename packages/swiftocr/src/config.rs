//! Turns parsed arguments into the recognition request and output filters.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use swiftocr_vision::{RecognitionLevel, RecognitionOptions};
use tokio::fs;
use tracing::debug;

use crate::cli::Args;
use crate::error::{AppError, Result};
use crate::results::OcrResults;

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Stdin,
}

impl ImageSource {
    /// `-` means standard input; anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ImageSource::Stdin
        } else {
            ImageSource::Path(PathBuf::from(arg))
        }
    }
}

/// Everything one invocation asks of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfiguration {
    pub source: ImageSource,
    pub recognition: RecognitionOptions,
}

impl OcrConfiguration {
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            recognition: RecognitionOptions::default(),
        }
    }

    /// Reads `--custom-words-file` if one was given.
    pub async fn from_args(args: &Args) -> Result<Self> {
        let mut custom_words = args.custom_words();
        if let Some(path) = &args.custom_words_file {
            custom_words.extend(read_words_file(Path::new(path)).await?);
        }
        let custom_words = dedup_keep_first(custom_words);
        let languages = args.languages();

        let recognition = RecognitionOptions {
            level: if args.fast {
                RecognitionLevel::Fast
            } else {
                RecognitionLevel::Accurate
            },
            auto_detect_language: languages.is_empty(),
            languages,
            language_correction: args.correction,
            custom_words,
        };
        debug!(?recognition, "recognition options");

        Ok(Self {
            source: args.image_source(),
            recognition,
        })
    }
}

/// Post-recognition narrowing of the result list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilters {
    pub min_confidence: Option<f64>,
    pub contains: Option<String>,
    pub search: Option<String>,
    pub threshold: f64,
    pub ignore_case: bool,
}

impl ResultFilters {
    pub fn from_args(args: &Args) -> Self {
        Self {
            min_confidence: args.min_confidence,
            contains: args.contains.clone(),
            search: args.search.clone(),
            threshold: args.threshold,
            ignore_case: args.ignore_case,
        }
    }

    pub fn apply(&self, mut results: OcrResults) -> OcrResults {
        if let Some(min) = self.min_confidence {
            results = results.minimum_confidence(min);
        }
        if let Some(text) = &self.contains {
            results = results.containing(text, self.ignore_case);
        }
        if let Some(query) = &self.search {
            results = results.search(query, self.threshold, self.ignore_case);
        }
        results
    }
}

/// Splits a comma separated option value, trimming items and dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One word per line; surrounding whitespace and blank lines are ignored.
pub fn parse_words(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

async fn read_words_file(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| AppError::CustomWordsFile {
            path: path.to_path_buf(),
            source,
        })?;
    let words = parse_words(&contents);
    debug!(path = %path.display(), count = words.len(), "read custom words file");
    Ok(words)
}

fn dedup_keep_first(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
