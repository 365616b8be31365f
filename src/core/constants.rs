//! Constants used throughout PII verification.

use image::Rgb;

/// Pixels the entity label is nudged up and to the left of its box corner.
pub const LABEL_OFFSET: i32 = 3;

/// Default outline color of region boxes (blue).
pub const DEFAULT_BBOX_COLOR: [u8; 3] = [0, 0, 255];

/// Default thickness of region box outlines, in pixels.
pub const DEFAULT_BBOX_THICKNESS: i32 = 2;

/// Default label font size, in pixels.
pub const DEFAULT_FONT_SCALE: f32 = 14.0;

/// Label padding as a fraction of the font size.
pub const DEFAULT_LABEL_PADDING: f32 = 0.5;

/// Label text color.
pub const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Label background color (90% grey).
pub const LABEL_BACKGROUND_COLOR: Rgb<u8> = Rgb([230, 230, 230]);

/// Language understood by the built-in pattern analyzer.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Option key holding the minimum OCR word confidence.
pub const OCR_THRESHOLD_KEY: &str = "ocr_threshold";
