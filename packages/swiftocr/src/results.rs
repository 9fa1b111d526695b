//! Output model and the query helpers for working with recognition results.

use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

use regex::Regex;
use serde::{Deserialize, Serialize};
use swiftocr_vision::Observation;

use crate::geometry::to_pixel_box;
use crate::similarity::ratio;

/// Pixel rectangle, origin at the top-left corner of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn center(&self) -> (u32, u32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    pub fn top_left(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn top_right(&self) -> (u32, u32) {
        (self.right(), self.y)
    }

    pub fn bottom_left(&self) -> (u32, u32) {
        (self.x, self.bottom())
    }

    pub fn bottom_right(&self) -> (u32, u32) {
        (self.right(), self.bottom())
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [(u32, u32); 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_left(),
            self.bottom_right(),
        ]
    }

    /// `(left, top, right, bottom)`, the form most crop APIs take.
    pub fn diagonal(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.right(), self.bottom())
    }

    /// True when `other` lies entirely inside `self`; shared edges count.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

/// One recognized line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedTextResult {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl RecognizedTextResult {
    pub fn new(text: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounding_box,
        }
    }

    /// Converts an engine observation into pixel space for an image of the
    /// given size.
    pub fn from_observation(observation: &Observation, image_width: u32, image_height: u32) -> Self {
        Self {
            text: observation.text.clone(),
            confidence: unit_confidence(observation.confidence),
            bounding_box: to_pixel_box(&observation.rect, image_width, image_height),
        }
    }

    pub fn similarity(&self, query: &str, ignore_case: bool) -> f64 {
        self.similarity_by(query, ignore_case, ratio)
    }

    /// Scores `query` against the text with a caller supplied `scorer`.
    pub fn similarity_by<F>(&self, query: &str, ignore_case: bool, scorer: F) -> f64
    where
        F: Fn(&str, &str) -> f64,
    {
        if ignore_case {
            scorer(&query.to_lowercase(), &self.text.to_lowercase())
        } else {
            scorer(query, &self.text)
        }
    }
}

/// NaN and infinities become 0 so the output stays valid JSON.
fn unit_confidence(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// An ordered list of results with chainable filters.
///
/// ```
/// use swiftocr::{BoundingBox, OcrResults, RecognizedTextResult};
///
/// let results = OcrResults::from(vec![
///     RecognizedTextResult::new("Invoice", 0.98, BoundingBox::new(10, 10, 80, 20)),
///     RecognizedTextResult::new("Total 42", 0.61, BoundingBox::new(10, 200, 90, 20)),
/// ]);
/// let hits = results.minimum_confidence(0.9).containing("invoice", true);
/// assert_eq!(hits.texts(), vec!["Invoice"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrResults {
    items: Vec<RecognizedTextResult>,
}

impl OcrResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON array the CLI prints.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&RecognizedTextResult> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&RecognizedTextResult> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&RecognizedTextResult> {
        self.items.get(index)
    }

    /// A copy of the results in `range`; bounds past the end are clamped.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Self::new();
        }
        self.items[start..end].iter().cloned().collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecognizedTextResult> {
        self.items.iter()
    }

    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|r| r.text.clone()).collect()
    }

    /// True if any result's text contains `text`.
    pub fn mentions(&self, text: &str) -> bool {
        self.items.iter().any(|r| r.text.contains(text))
    }

    pub fn into_vec(self) -> Vec<RecognizedTextResult> {
        self.items
    }

    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&RecognizedTextResult) -> bool,
    {
        self.items
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }

    pub fn minimum_confidence(&self, threshold: f64) -> Self {
        self.filter(|r| f64::from(r.confidence) >= threshold)
    }

    /// Results whose box lies fully inside the given rectangle.
    pub fn within(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let area = BoundingBox::new(x, y, width, height);
        self.filter(|r| area.contains(&r.bounding_box))
    }

    pub fn containing(&self, text: &str, ignore_case: bool) -> Self {
        if ignore_case {
            let needle = text.to_lowercase();
            self.filter(|r| r.text.to_lowercase().contains(&needle))
        } else {
            self.filter(|r| r.text.contains(text))
        }
    }

    pub fn exactly(&self, text: &str, ignore_case: bool) -> Self {
        if ignore_case {
            let needle = text.to_lowercase();
            self.filter(|r| r.text.to_lowercase() == needle)
        } else {
            self.filter(|r| r.text == text)
        }
    }

    /// Results whose text matches `pattern` anywhere.
    pub fn matching(&self, pattern: &Regex) -> Self {
        self.filter(|r| pattern.is_match(&r.text))
    }

    /// Results scoring at least `threshold` against `query`, best first.
    pub fn search(&self, query: &str, threshold: f64, ignore_case: bool) -> Self {
        self.search_by(query, threshold, ignore_case, ratio)
    }

    /// [`search`](Self::search) with a custom similarity function in `[0, 1]`.
    pub fn search_by<F>(&self, query: &str, threshold: f64, ignore_case: bool, scorer: F) -> Self
    where
        F: Fn(&str, &str) -> f64,
    {
        self.search_and_score_by(query, threshold, ignore_case, scorer)
            .into_iter()
            .map(|(_, r)| r)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps the similarity scores.
    ///
    /// Ties are broken by position (left to right, then top to bottom) and
    /// then by lower confidence first.
    pub fn search_and_score(
        &self,
        query: &str,
        threshold: f64,
        ignore_case: bool,
    ) -> Vec<(f64, RecognizedTextResult)> {
        self.search_and_score_by(query, threshold, ignore_case, ratio)
    }

    pub fn search_and_score_by<F>(
        &self,
        query: &str,
        threshold: f64,
        ignore_case: bool,
        scorer: F,
    ) -> Vec<(f64, RecognizedTextResult)>
    where
        F: Fn(&str, &str) -> f64,
    {
        let mut scored: Vec<(f64, RecognizedTextResult)> = self
            .items
            .iter()
            .map(|r| (r.similarity_by(query, ignore_case, &scorer), r.clone()))
            .filter(|(score, _)| *score >= threshold)
            .collect();

        scored.sort_by(|(sa, a), (sb, b)| {
            sb.partial_cmp(sa)
                .unwrap_or(Ordering::Equal)
                .then(a.bounding_box.x.cmp(&b.bounding_box.x))
                .then(a.bounding_box.y.cmp(&b.bounding_box.y))
                .then(
                    a.confidence
                        .partial_cmp(&b.confidence)
                        .unwrap_or(Ordering::Equal),
                )
        });
        scored
    }
}

impl From<Vec<RecognizedTextResult>> for OcrResults {
    fn from(items: Vec<RecognizedTextResult>) -> Self {
        Self { items }
    }
}

impl FromIterator<RecognizedTextResult> for OcrResults {
    fn from_iter<I: IntoIterator<Item = RecognizedTextResult>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OcrResults {
    type Item = RecognizedTextResult;
    type IntoIter = std::vec::IntoIter<RecognizedTextResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a OcrResults {
    type Item = &'a RecognizedTextResult;
    type IntoIter = std::slice::Iter<'a, RecognizedTextResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
