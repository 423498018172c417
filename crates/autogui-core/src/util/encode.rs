//! Image encoding for screenshots
//!
//! Inline screenshots are always PNG and travel as base64 text. Screenshots
//! saved to disk are encoded according to their file extension; extensions the
//! encoder does not know fall back to PNG bytes.
//!
//! # Examples
//!
//! ```
//! use autogui_core::{capture::ImageBuffer, util::encode::encode_png_base64};
//!
//! let img = ImageBuffer::from_test_pattern(64, 64);
//! let text = encode_png_base64(&img).unwrap();
//! assert!(text.starts_with("iVBORw0KGgo"));
//! ```

use std::{io::Cursor, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{
        bmp::BmpEncoder,
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
};

use crate::{
    capture::ImageBuffer,
    error::{AutomationError, AutomationResult},
};

/// JPEG quality used for `.jpg` screenshots
const JPEG_QUALITY: u8 = 90;

/// On-disk encodings supported for saved screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Png,
    Jpeg,
    Bmp,
}

impl SaveFormat {
    /// Picks the encoding for a file name from its extension
    ///
    /// ```
    /// use autogui_core::util::encode::SaveFormat;
    ///
    /// assert_eq!(SaveFormat::for_path("shot.JPG".as_ref()), SaveFormat::Jpeg);
    /// assert_eq!(SaveFormat::for_path("shot.bmp".as_ref()), SaveFormat::Bmp);
    /// assert_eq!(SaveFormat::for_path("shot.tiff".as_ref()), SaveFormat::Png);
    /// assert_eq!(SaveFormat::for_path("shot".as_ref()), SaveFormat::Png);
    /// ```
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => SaveFormat::Jpeg,
            Some("bmp") => SaveFormat::Bmp,
            _ => SaveFormat::Png,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpeg",
            SaveFormat::Bmp => "bmp",
        }
    }
}

fn encoding_failed(format: SaveFormat, e: impl ToString) -> AutomationError {
    AutomationError::EncodingFailed {
        format: format.as_str().to_string(),
        reason: e.to_string(),
    }
}

/// Encodes an image as PNG with default compression
pub fn encode_png(buffer: &ImageBuffer) -> AutomationResult<Vec<u8>> {
    let mut output = Vec::new();

    // Adaptive filtering picks the best filter per scanline
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut output),
        CompressionType::Default,
        FilterType::Adaptive,
    );

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    encoder
        .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| encoding_failed(SaveFormat::Png, e))?;

    Ok(output)
}

/// Encodes an image as JPEG, dropping the alpha channel
pub fn encode_jpeg(buffer: &ImageBuffer) -> AutomationResult<Vec<u8>> {
    let rgb = buffer.inner().to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(encoding_failed(SaveFormat::Jpeg, "image dimensions must be > 0"));
    }

    let mut output = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut output), JPEG_QUALITY)
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| encoding_failed(SaveFormat::Jpeg, e))?;

    Ok(output)
}

/// Encodes an image as an uncompressed BMP
pub fn encode_bmp(buffer: &ImageBuffer) -> AutomationResult<Vec<u8>> {
    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut output = Vec::new();
    BmpEncoder::new(&mut Cursor::new(&mut output))
        .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| encoding_failed(SaveFormat::Bmp, e))?;

    Ok(output)
}

/// Encodes an image in the given on-disk format
pub fn encode_as(buffer: &ImageBuffer, format: SaveFormat) -> AutomationResult<Vec<u8>> {
    match format {
        SaveFormat::Png => encode_png(buffer),
        SaveFormat::Jpeg => encode_jpeg(buffer),
        SaveFormat::Bmp => encode_bmp(buffer),
    }
}

/// Encodes an image as PNG and returns it as standard base64 text
pub fn encode_png_base64(buffer: &ImageBuffer) -> AutomationResult<String> {
    Ok(STANDARD.encode(encode_png(buffer)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_magic_bytes() {
        let img = ImageBuffer::from_test_pattern(32, 16);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], PNG_MAGIC);
    }

    #[test]
    fn test_encode_png_decodes_to_same_size() {
        let img = ImageBuffer::from_test_pattern(40, 30);
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let img = ImageBuffer::from_test_pattern(32, 32);
        let bytes = encode_jpeg(&img).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_rejects_empty_image() {
        let img = ImageBuffer::from_test_pattern(0, 0);
        let err = encode_jpeg(&img).unwrap_err();
        assert!(matches!(err, AutomationError::EncodingFailed { .. }));
    }

    #[test]
    fn test_encode_bmp_magic_bytes() {
        let img = ImageBuffer::from_test_pattern(8, 8);
        let bytes = encode_bmp(&img).unwrap();
        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn test_encode_as_dispatches_on_format() {
        let img = ImageBuffer::from_test_pattern(8, 8);
        assert_eq!(&encode_as(&img, SaveFormat::Png).unwrap()[..8], PNG_MAGIC);
        assert_eq!(&encode_as(&img, SaveFormat::Bmp).unwrap()[..2], b"BM");
    }

    #[test]
    fn test_base64_round_trip_is_png() {
        let img = ImageBuffer::from_test_pattern(8, 8);
        let text = encode_png_base64(&img).unwrap();
        let bytes = STANDARD.decode(text).unwrap();
        assert_eq!(&bytes[..8], PNG_MAGIC);
    }
}
