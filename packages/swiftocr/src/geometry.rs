//! Engine coordinates to pixel coordinates.
//!
//! Engines report rectangles in the unit square with the origin at the
//! bottom-left corner. Output boxes are whole pixels with the origin at the
//! top-left corner.

use swiftocr_vision::NormalizedRect;

use crate::results::BoundingBox;

/// Maps `rect` onto an `image_width` x `image_height` image.
///
/// ```text
/// x      = floor(rect.x * image_width)
/// width  = floor(rect.width * image_width)
/// height = floor(rect.height * image_height)
/// y      = floor(image_height - rect.y * image_height - height)
/// ```
///
/// Parts of the box falling outside the image are cut off, so the result
/// always fits inside it. Non-finite inputs count as zero.
pub fn to_pixel_box(rect: &NormalizedRect, image_width: u32, image_height: u32) -> BoundingBox {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let w = f64::from(image_width);
    let h = f64::from(image_height);

    let x = (finite(rect.x) * w).floor();
    let width = (finite(rect.width).max(0.0) * w).floor();
    let height = (finite(rect.height).max(0.0) * h).floor();
    let y = (h - finite(rect.y) * h - height).floor();

    let (x, width) = clip_span(x, width, w);
    let (y, height) = clip_span(y, height, h);
    BoundingBox {
        x,
        y,
        width,
        height,
    }
}

/// Clips the span `[start, start + len)` to `[0, max)`.
fn clip_span(start: f64, len: f64, max: f64) -> (u32, u32) {
    let (start, len) = if start < 0.0 {
        (0.0, (len + start).max(0.0))
    } else {
        (start.min(max), len)
    };
    let len = len.min(max - start);
    (start as u32, len as u32)
}
