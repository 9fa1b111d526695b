use image::DynamicImage;
use tracing::debug;

use crate::engine::OcrError;

/// Decoded image handed to an engine: tightly packed 8-bit RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl OcrImage {
    /// Decodes an encoded image (PNG, JPEG, TIFF, ...), sniffing the format
    /// from its contents.
    pub fn decode(bytes: &[u8]) -> Result<Self, OcrError> {
        if bytes.is_empty() {
            return Err(OcrError::InvalidInput("empty image data".into()));
        }
        let image = image::load_from_memory(bytes)?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "decoded image"
        );
        Self::from_dynamic(image)
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self, OcrError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Wraps a raw RGBA buffer. Alpha is flattened onto a white background.
    pub fn from_rgba(width: u32, height: u32, mut pixels: Vec<u8>) -> Result<Self, OcrError> {
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidInput(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(OcrError::InvalidInput(format!(
                "expected {expected} bytes of RGBA data, got {}",
                pixels.len()
            )));
        }
        flatten_onto_white(&mut pixels);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * 4
    }

    /// Packed RGB copy of the pixels, for engines without an alpha channel.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

fn flatten_onto_white(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let alpha = u16::from(px[3]);
        if alpha == 255 {
            continue;
        }
        for channel in &mut px[..3] {
            let c = u16::from(*channel);
            *channel = ((c * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_dimensions() {
        let bytes = encode_png(RgbaImage::from_pixel(7, 3, Rgba([0, 0, 0, 255])));
        let image = OcrImage::decode(&bytes).unwrap();
        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 3);
        assert_eq!(image.pixels().len(), 7 * 3 * 4);
        assert_eq!(image.bytes_per_row(), 28);
    }

    #[test]
    fn rejects_garbage() {
        let err = OcrImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn rejects_empty_input() {
        let err = OcrImage::decode(&[]).unwrap_err();
        assert!(matches!(err, OcrError::InvalidInput(_)));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let image = OcrImage::from_rgba(2, 1, vec![0, 0, 0, 0, 10, 20, 30, 255]).unwrap();
        assert_eq!(image.pixels(), &[255, 255, 255, 255, 10, 20, 30, 255]);
    }

    #[test]
    fn half_transparent_black_becomes_grey() {
        let image = OcrImage::from_rgba(1, 1, vec![0, 0, 0, 128]).unwrap();
        assert_eq!(image.pixels(), &[127, 127, 127, 255]);
    }

    #[test]
    fn buffer_size_must_match_dimensions() {
        assert!(OcrImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(OcrImage::from_rgba(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn rgb_copy_drops_alpha() {
        let image = OcrImage::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();
        assert_eq!(image.to_rgb(), vec![1, 2, 3]);
    }
}
