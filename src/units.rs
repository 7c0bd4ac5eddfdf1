//! Length units.
//!
//! PDF user space is measured in points: 1 inch = 72 points.

/// Points per inch.
pub const INCH: f64 = 72.0;

/// Points per centimetre.
pub const CM: f64 = INCH / 2.54;

/// Resolution assumed for image pages unless configured otherwise.
pub const DEFAULT_DPI: f64 = 150.0;

/// Convert a pixel count at `dpi` dots per inch to points.
pub fn pixels_to_points(pixels: u32, dpi: f64) -> f64 {
    f64::from(pixels) / dpi * INCH
}
