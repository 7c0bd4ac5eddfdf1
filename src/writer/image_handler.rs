//! JPEG image XObjects.
//!
//! Per PDF spec Section 8.9, images are represented as XObjects. JPEG data is
//! embedded as-is under the DCTDecode filter: the viewer decodes it, this
//! crate never does. The only thing read from the payload, and only on
//! request, is the frame header that carries the pixel dimensions.

use crate::error::{Error, Result};
use crate::units::pixels_to_points;
use std::io::Cursor;

/// Resource name under which a page's image is registered.
pub const IMAGE_RESOURCE_NAME: &str = "I";

/// Colour space declared for every image.
///
/// Grayscale or CMYK JPEGs are declared RGB too; the payload is never
/// inspected for its component count.
pub const IMAGE_COLOR_SPACE: &str = "DeviceRGB";

/// Bits per colour component declared for every image.
pub const IMAGE_BITS_PER_COMPONENT: u8 = 8;

/// Filter that lets the payload be stored undecoded.
pub const JPEG_FILTER: &str = "DCTDecode";

/// An already-encoded JPEG and the pixel size it decodes to.
#[derive(Debug, Clone, Copy)]
pub struct JpegImage<'a> {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Encoded JPEG bytes
    pub data: &'a [u8],
}

impl<'a> JpegImage<'a> {
    /// Pair a JPEG payload with its pixel dimensions.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take the pixel dimensions from an already decoded image.
    pub fn from_decoded<I>(image: &I, data: &'a [u8]) -> Result<Self>
    where
        I: image::GenericImageView,
    {
        let (width, height) = image.dimensions();
        Self::new(width, height, data)
    }

    /// Read the pixel dimensions from the JPEG frame header.
    pub fn probe(data: &'a [u8]) -> Result<Self> {
        let (width, height) = probe_dimensions(data)?;
        Self::new(width, height, data)
    }

    /// Page size in points when the image is shown at `dpi`.
    pub fn page_size(&self, dpi: f64) -> (f64, f64) {
        (pixels_to_points(self.width, dpi), pixels_to_points(self.height, dpi))
    }
}

/// Read the pixel dimensions of a JPEG without decoding its scan data.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    image::io::Reader::with_format(Cursor::new(data), image::ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|e| Error::Image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Baseline 1x1 grayscale JPEG
    const MINIMAL_JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x08, 0x06, 0x06, 0x07, 0x06,
        0x05, 0x08, 0x07, 0x07, 0x07, 0x09, 0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B,
        0x0C, 0x19, 0x12, 0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20,
        0x24, 0x2E, 0x27, 0x20, 0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29, 0x2C, 0x30, 0x31,
        0x34, 0x34, 0x34, 0x1F, 0x27, 0x39, 0x3D, 0x38, 0x32, 0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF,
        0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xC4, 0x00,
        0x1F, 0x00, 0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
        0xFF, 0xC4, 0x00, 0xB5, 0x10, 0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05,
        0x04, 0x04, 0x00, 0x00, 0x01, 0x7D, 0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21,
        0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
        0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A,
        0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35, 0x36, 0x37,
        0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56,
        0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
        0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93,
        0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9,
        0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6,
        0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
        0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7,
        0xF8, 0xF9, 0xFA, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0xFB, 0xD5,
        0xDB, 0x20, 0xA8, 0xF1, 0x47, 0xFF, 0xD9,
    ];

    #[test]
    fn test_page_size_at_150_dpi() {
        let image = JpegImage::new(1500, 1050, &[]).unwrap();
        let (w, h) = image.page_size(150.0);
        assert!((w - 720.0).abs() < 1e-9);
        assert!((h - 504.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            JpegImage::new(0, 10, &[]),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            JpegImage::new(10, 0, &[]),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_decoded_image() {
        let decoded = image::RgbImage::new(40, 30);
        let image = JpegImage::from_decoded(&decoded, b"jpeg").unwrap();
        assert_eq!((image.width, image.height), (40, 30));
        assert_eq!(image.data, b"jpeg");
    }

    #[test]
    fn test_probe_minimal_jpeg() {
        let image = JpegImage::probe(MINIMAL_JPEG).unwrap();
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.data.len(), MINIMAL_JPEG.len());
    }

    #[test]
    fn test_probe_rejects_non_jpeg() {
        assert!(matches!(probe_dimensions(b"not a jpeg"), Err(Error::Image(_))));
    }
}
