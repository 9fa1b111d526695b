//! Reads image bytes from a file or standard input and decodes them.
use std::io;

use swiftocr_vision::OcrImage;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::config::ImageSource;
use crate::error::{AppError, Result};

/// Reads the raw, still encoded image. `stdin` is only touched for
/// [`ImageSource::Stdin`].
pub async fn read_bytes<R>(source: &ImageSource, stdin: R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let bytes = match source {
        ImageSource::Path(path) => {
            debug!(path = %path.display(), "reading image file");
            fs::read(path).await.map_err(AppError::LoadImage)?
        }
        ImageSource::Stdin => {
            debug!("reading image from standard input");
            let mut stdin = stdin;
            let mut buf = Vec::new();
            stdin
                .read_to_end(&mut buf)
                .await
                .map_err(AppError::LoadImage)?;
            buf
        }
    };

    if bytes.is_empty() {
        return Err(AppError::LoadImage(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no image data",
        )));
    }
    debug!(bytes = bytes.len(), "read image");
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<OcrImage> {
    OcrImage::decode(bytes).map_err(AppError::DecodeImage)
}

pub async fn load_image<R>(source: &ImageSource, stdin: R) -> Result<OcrImage>
where
    R: AsyncRead + Unpin,
{
    let bytes = read_bytes(source, stdin).await?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::{Cursor, Write};
    use std::path::PathBuf;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&png_bytes(12, 5)).unwrap();
        let source = ImageSource::Path(file.path().to_path_buf());

        let image = load_image(&source, tokio::io::empty()).await.unwrap();
        assert_eq!((image.width(), image.height()), (12, 5));
    }

    #[tokio::test]
    async fn loads_from_stdin() {
        let bytes = png_bytes(3, 4);
        let image = load_image(&ImageSource::Stdin, &bytes[..]).await.unwrap();
        assert_eq!((image.width(), image.height()), (3, 4));
    }

    #[tokio::test]
    async fn missing_file_fails_to_load() {
        let source = ImageSource::Path(PathBuf::from("/nonexistent/swiftocr/image.png"));
        let err = load_image(&source, tokio::io::empty()).await.unwrap_err();
        assert!(matches!(err, AppError::LoadImage(_)));
        assert_eq!(err.to_string(), "Failed to load image.");
    }

    #[tokio::test]
    async fn empty_stdin_fails_to_load() {
        let err = load_image(&ImageSource::Stdin, tokio::io::empty()).await.unwrap_err();
        assert!(matches!(err, AppError::LoadImage(_)));
    }

    #[tokio::test]
    async fn garbage_fails_to_decode() {
        let err = load_image(&ImageSource::Stdin, &b"just some text, not pixels"[..])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DecodeImage(_)));
        assert_eq!(err.to_string(), "Failed to decode image.");
    }
}
