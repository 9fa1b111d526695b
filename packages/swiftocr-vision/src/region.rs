/// Rectangle in the unit square with its origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the normalized form of a top-left-origin pixel rectangle.
    pub fn from_pixel_rect(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let iw = f64::from(image_width.max(1));
        let ih = f64::from(image_height.max(1));
        Self {
            x: left / iw,
            y: (ih - top - height) / ih,
            width: width / iw,
            height: height / ih,
        }
    }
}

/// One raw engine result.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub text: String,
    pub confidence: f32,
    pub rect: NormalizedRect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_rect_flips_vertical_axis() {
        let rect = NormalizedRect::from_pixel_rect(10.0, 20.0, 50.0, 30.0, 100, 200);
        assert!((rect.x - 0.1).abs() < 1e-9);
        assert!((rect.y - 0.75).abs() < 1e-9);
        assert!((rect.width - 0.5).abs() < 1e-9);
        assert!((rect.height - 0.15).abs() < 1e-9);
    }
}
