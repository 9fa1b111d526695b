//! Command line arguments backing the `swiftocr` binary.
use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{split_list, ImageSource};

#[derive(Parser, Debug)]
#[command(
  name = "swiftocr",
  about = "Recognize text in an image and print it as JSON with pixel bounding boxes",
  version,
  arg_required_else_help = true,
  after_help = "Examples:\n  swiftocr receipt.png --languages en-US --correction\n  cat scan.jpg | swiftocr - --fast"
)]
pub struct Args {
  /// Image file to read, or `-` to read the image from standard input
  #[arg(value_name = "IMAGE_PATH")]
  pub image: String,

  /// Prefer speed over accuracy
  #[arg(long)]
  pub fast: bool,

  /// Comma separated language tags in priority order (e.g. en-US,fr-FR)
  #[arg(long, value_name = "LANGS", value_parser = option_value)]
  pub languages: Option<String>,

  /// Apply language correction to the recognized text
  #[arg(long)]
  pub correction: bool,

  /// Comma separated words to bias recognition towards
  #[arg(long, value_name = "WORDS", value_parser = option_value)]
  pub custom_words: Option<String>,

  /// File with one custom word per line
  #[arg(long, value_name = "PATH", value_parser = option_value)]
  pub custom_words_file: Option<String>,

  /// Drop results whose confidence is below this value
  #[arg(long, value_name = "0.0-1.0", value_parser = unit_interval)]
  pub min_confidence: Option<f64>,

  /// Keep only results whose text contains this string
  #[arg(long, value_name = "TEXT", value_parser = option_value)]
  pub contains: Option<String>,

  /// Rank results by similarity to this query, best match first
  #[arg(long, value_name = "QUERY", value_parser = option_value)]
  pub search: Option<String>,

  /// Minimum similarity a result needs to be kept by --search
  #[arg(long, value_name = "0.0-1.0", value_parser = unit_interval, default_value = "0")]
  pub threshold: f64,

  /// Compare case-insensitively in --contains and --search
  #[arg(long)]
  pub ignore_case: bool,

  /// Print the JSON on a single line
  #[arg(long)]
  pub compact: bool,

  /// Print debug diagnostics to standard error
  #[arg(long, short = 'v')]
  pub verbose: bool,
}

impl Args {
  pub fn image_source(&self) -> ImageSource {
    ImageSource::from_arg(&self.image)
  }

  pub fn languages(&self) -> Vec<String> {
    self.languages.as_deref().map(split_list).unwrap_or_default()
  }

  pub fn custom_words(&self) -> Vec<String> {
    self.custom_words.as_deref().map(split_list).unwrap_or_default()
  }
}

/// Help, version and the no-argument usage are rendered by clap as is.
pub fn is_usage_display(err: &clap::Error) -> bool {
  matches!(
    err.kind(),
    ErrorKind::DisplayHelp
      | ErrorKind::DisplayVersion
      | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
  )
}

/// Condenses a clap error into a single line without its `error: ` prefix.
pub fn error_line(err: &clap::Error) -> String {
  let rendered = err.to_string();
  let message = rendered
    .split("\n\n")
    .next()
    .unwrap_or_default()
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
  message
    .strip_prefix("error: ")
    .unwrap_or(&message)
    .to_string()
}

/// Values may not be empty or look like another option.
fn option_value(value: &str) -> Result<String, String> {
  if value.trim().is_empty() {
    return Err("value must not be empty".to_string());
  }
  if value.starts_with('-') {
    return Err(format!("value must not start with '-': {value}"));
  }
  Ok(value.to_string())
}

fn unit_interval(value: &str) -> Result<f64, String> {
  let parsed = option_value(value)?
    .parse::<f64>()
    .map_err(|e| format!("{value} is not a number: {e}"))?;
  if !(0.0..=1.0).contains(&parsed) {
    return Err(format!("{value} is not between 0.0 and 1.0"));
  }
  Ok(parsed)
}
