//! Visualization of detected PII regions.
//!
//! This module draws the annotations used to verify detections: an unfilled
//! outline around each region and the entity type written just above its
//! top-left corner on a light rounded background.
//!
//! # Layout
//!
//! - Outlines grow outward from the region edge by `bbox_thickness` pixels
//! - Labels start at `(left - 3, top - 3)`: the text baseline sits 3 pixels
//!   above the region and the text begins 3 pixels left of it
//! - All outlines are drawn before any label, so labels sit on top
//! - Anything falling outside the image is clipped, never repositioned
//!
//! # Examples
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use pii_verify::domain::DetectedRegion;
//! use pii_verify::utils::visualization::{annotate_regions, VisualizationConfig};
//!
//! let mut img = RgbImage::from_pixel(120, 40, Rgb([255, 255, 255]));
//! let regions = [DetectedRegion::new("EMAIL_ADDRESS", 10.0, 10.0, 60.0, 15.0)];
//! annotate_regions(&mut img, &regions, &VisualizationConfig::default());
//! assert_eq!(img.get_pixel(10, 18), &Rgb([0, 0, 255]));
//! ```

use crate::core::config::VisualizationSettings;
use crate::core::constants::{
    DEFAULT_BBOX_COLOR, DEFAULT_BBOX_THICKNESS, DEFAULT_FONT_SCALE, DEFAULT_LABEL_PADDING,
    LABEL_BACKGROUND_COLOR, LABEL_OFFSET, LABEL_TEXT_COLOR,
};
use crate::core::errors::{PiiError, PiiResult};
use crate::domain::DetectedRegion;

use ab_glyph::{Font, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for drawing detected regions.
///
/// The font is optional: without one, outlines are still drawn but labels
/// are skipped.
pub struct VisualizationConfig {
    /// The font to use for labels. If None, labels are skipped.
    pub font: Option<FontVec>,

    /// Label font size in pixels. Defaults to 14.0.
    pub font_scale: f32,

    /// The thickness of region outlines. Defaults to 2.
    pub bbox_thickness: i32,

    /// Outline color. Defaults to blue.
    pub bbox_color: Rgb<u8>,

    /// Label padding as a fraction of the font size. Defaults to 0.5.
    pub label_padding: f32,
}

impl Default for VisualizationConfig {
    /// No font, 14px labels, 2px blue outlines.
    fn default() -> Self {
        Self {
            font: None,
            font_scale: DEFAULT_FONT_SCALE,
            bbox_thickness: DEFAULT_BBOX_THICKNESS,
            bbox_color: Rgb(DEFAULT_BBOX_COLOR),
            label_padding: DEFAULT_LABEL_PADDING,
        }
    }
}

impl VisualizationConfig {
    /// Creates a VisualizationConfig with a font loaded from the specified path.
    ///
    /// # Errors
    ///
    /// Returns `PiiError::Io` if the file cannot be read and
    /// `PiiError::ConfigError` if it is not a usable font.
    pub fn with_font_path(font_path: &Path) -> PiiResult<Self> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            PiiError::config_error(format!(
                "Failed to parse font file: {}",
                font_path.display()
            ))
        })?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Creates a VisualizationConfig with a system font.
    ///
    /// This function attempts to load a system font from common locations.
    /// If no system font is found, it falls back to the default configuration.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                info!("Loaded system font: {}", path);
                return Self {
                    font: Some(font),
                    ..Self::default()
                };
            }
        }

        debug!("No system font found, labels will be skipped");
        Self::default()
    }

    /// Builds a config from file-level settings.
    ///
    /// A font path that cannot be loaded falls back to the system font.
    pub fn from_settings(settings: &VisualizationSettings) -> Self {
        let base = match &settings.font_path {
            Some(path) => VisualizationConfig::with_font_path(path)
                .inspect(|_| info!("Using custom font: {}", path.display()))
                .unwrap_or_else(|e| {
                    warn!(
                        "Failed to load custom font {}: {}. Falling back to system font.",
                        path.display(),
                        e
                    );
                    VisualizationConfig::with_system_font()
                }),
            None => VisualizationConfig::with_system_font(),
        };

        Self {
            font_scale: settings.font_scale,
            bbox_thickness: settings.bbox_thickness,
            bbox_color: Rgb(settings.bbox_color),
            ..base
        }
    }
}

/// Draws every region's outline and then every region's label onto `img`.
///
/// Regions are drawn in list order; overlapping labels are not moved apart.
pub fn annotate_regions(
    img: &mut RgbImage,
    regions: &[DetectedRegion],
    config: &VisualizationConfig,
) {
    for region in regions {
        match region.to_rect() {
            Some(rect) => draw_region_box(img, rect, config),
            None => debug!(
                "Skipping outline of degenerate {} region at ({}, {})",
                region.entity_type, region.left, region.top
            ),
        }
    }

    let Some(font) = &config.font else {
        debug!("No font configured, skipping {} labels", regions.len());
        return;
    };

    for region in regions {
        draw_region_label(img, region, font, config);
    }
}

/// Draws an outline `bbox_thickness` pixels wide, growing outward from `rect`.
fn draw_region_box(img: &mut RgbImage, rect: Rect, config: &VisualizationConfig) {
    let Some((rect, rings)) = clip_outline(rect, config.bbox_thickness, img.dimensions()) else {
        return;
    };

    for thickness in 0..rings {
        let thick_rect = Rect::at(rect.left() - thickness, rect.top() - thickness).of_size(
            rect.width() + (2 * thickness) as u32,
            rect.height() + (2 * thickness) as u32,
        );
        draw_hollow_rect_mut(img, thick_rect, config.bbox_color);
    }
}

/// Shrinks `rect` to the canvas widened by the outline thickness.
///
/// Edges moved by the clamp land outside the image together with every ring
/// grown from them, so the visible part of the outline is unchanged. Returns
/// `None` when no ring can touch the image, otherwise the clamped rectangle
/// and the number of rings worth drawing.
fn clip_outline(rect: Rect, thickness: i32, (width, height): (u32, u32)) -> Option<(Rect, i32)> {
    let (width, height) = (i64::from(width), i64::from(height));
    let rings = i64::from(thickness).clamp(0, width.max(height) + 1);
    if rings == 0 {
        return None;
    }

    let left = i64::from(rect.left());
    let top = i64::from(rect.top());
    let right = left + i64::from(rect.width()) - 1;
    let bottom = top + i64::from(rect.height()) - 1;

    if right + rings < 0 || bottom + rings < 0 || left - rings >= width || top - rings >= height {
        return None;
    }

    let left = left.max(-rings);
    let top = top.max(-rings);
    let right = right.min(width + rings);
    let bottom = bottom.min(height + rings);

    let clipped = Rect::at(left as i32, top as i32)
        .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
    Some((clipped, rings as i32))
}

/// Draws the entity type with its baseline `LABEL_OFFSET` pixels above the
/// region and its left edge `LABEL_OFFSET` pixels left of it.
fn draw_region_label(
    img: &mut RgbImage,
    region: &DetectedRegion,
    font: &FontVec,
    config: &VisualizationConfig,
) {
    let text = region.entity_type.as_str();
    if text.is_empty() || !region.left.is_finite() || !region.top.is_finite() {
        return;
    }

    let (text_width, text_height) = text_size(config.font_scale, font, text);
    if text_width == 0 || text_height == 0 {
        return;
    }

    let pad = i64::from((config.label_padding * config.font_scale).round().max(0.0) as i32);
    let text_x = region.left.round() as i64 - i64::from(LABEL_OFFSET);
    let baseline = region.top.round() as i64 - i64::from(LABEL_OFFSET);
    let (text_width, text_height) = (i64::from(text_width), i64::from(text_height));

    let (width, height) = img.dimensions();
    let (bg_left, bg_top) = (text_x - pad, baseline - text_height - pad);
    let (bg_right, bg_bottom) = (text_x + text_width + pad, baseline + pad);
    if bg_right <= 0 || bg_bottom <= 0 || bg_left >= i64::from(width) || bg_top >= i64::from(height)
    {
        return;
    }

    let background = Rect::at(bg_left as i32, bg_top as i32)
        .of_size((bg_right - bg_left) as u32, (bg_bottom - bg_top) as u32);
    draw_rounded_rect_mut(img, background, pad as i32, LABEL_BACKGROUND_COLOR);

    // Glyphs are laid out from the top of the line, one ascent above the baseline.
    let ascent = font.as_scaled(config.font_scale).ascent().round() as i64;
    draw_text_mut(
        img,
        LABEL_TEXT_COLOR,
        text_x as i32,
        (baseline - ascent) as i32,
        config.font_scale,
        font,
        text,
    );
}

/// Fills `rect` with corners rounded to `radius`.
///
/// The radius is clamped to half the shorter side.
fn draw_rounded_rect_mut(img: &mut RgbImage, rect: Rect, radius: i32, color: Rgb<u8>) {
    let (left, top) = (rect.left(), rect.top());
    let (width, height) = (rect.width() as i32, rect.height() as i32);
    let r = radius.min(width / 2).min(height / 2).max(0);

    if r == 0 {
        draw_filled_rect_mut(img, rect, color);
        return;
    }

    let inner_width = width - 2 * r;
    if inner_width > 0 {
        draw_filled_rect_mut(
            img,
            Rect::at(left + r, top).of_size(inner_width as u32, height as u32),
            color,
        );
    }
    let inner_height = height - 2 * r;
    if inner_height > 0 {
        draw_filled_rect_mut(
            img,
            Rect::at(left, top + r).of_size(width as u32, inner_height as u32),
            color,
        );
    }

    let (right, bottom) = (left + width - 1, top + height - 1);
    for center in [
        (left + r, top + r),
        (right - r, top + r),
        (left + r, bottom - r),
        (right - r, bottom - r),
    ] {
        draw_filled_circle_mut(img, center, r, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, WHITE)
    }

    #[test]
    fn test_outline_is_drawn_on_region_edges() {
        let mut img = white(100, 60);
        let regions = [DetectedRegion::new("PHONE_NUMBER", 10.0, 10.0, 40.0, 20.0)];
        annotate_regions(&mut img, &regions, &VisualizationConfig::default());

        assert_eq!(img.get_pixel(10, 20), &BLUE);
        assert_eq!(img.get_pixel(49, 20), &BLUE);
        assert_eq!(img.get_pixel(30, 29), &BLUE);
        // second ring grows outward
        assert_eq!(img.get_pixel(9, 20), &BLUE);
        // interior stays untouched
        assert_eq!(img.get_pixel(30, 20), &WHITE);
    }

    #[test]
    fn test_custom_thickness_and_color() {
        let mut img = white(50, 50);
        let config = VisualizationConfig {
            bbox_thickness: 1,
            bbox_color: Rgb([255, 0, 0]),
            ..VisualizationConfig::default()
        };
        annotate_regions(&mut img, &[DetectedRegion::new("X", 10.0, 10.0, 10.0, 10.0)], &config);

        assert_eq!(img.get_pixel(10, 15), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(9, 15), &WHITE);
    }

    #[test]
    fn test_regions_outside_image_are_clipped() {
        let mut img = white(30, 30);
        let regions = [
            DetectedRegion::new("EDGE", 20.0, 20.0, 40.0, 40.0),
            DetectedRegion::new("FAR", 500.0, 500.0, 10.0, 10.0),
            DetectedRegion::new("NEG", -5.0, -5.0, 10.0, 10.0),
        ];
        annotate_regions(&mut img, &regions, &VisualizationConfig::default());

        assert_eq!(img.dimensions(), (30, 30));
        assert_eq!(img.get_pixel(25, 20), &BLUE);
        assert_eq!(img.get_pixel(4, 2), &BLUE);
    }

    #[test]
    fn test_degenerate_region_draws_nothing_without_font() {
        let mut img = white(20, 20);
        annotate_regions(
            &mut img,
            &[DetectedRegion::new("ZERO", 5.0, 5.0, 0.0, 0.0)],
            &VisualizationConfig::default(),
        );
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_zero_thickness_draws_no_outline() {
        let mut img = white(20, 20);
        let config = VisualizationConfig {
            bbox_thickness: 0,
            ..VisualizationConfig::default()
        };
        annotate_regions(&mut img, &[DetectedRegion::new("X", 2.0, 2.0, 8.0, 8.0)], &config);
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_rounded_rect_leaves_corners() {
        let mut img = white(30, 20);
        draw_rounded_rect_mut(&mut img, Rect::at(0, 0).of_size(20, 10), 5, LABEL_BACKGROUND_COLOR);

        assert_eq!(img.get_pixel(10, 5), &LABEL_BACKGROUND_COLOR);
        assert_eq!(img.get_pixel(0, 5), &LABEL_BACKGROUND_COLOR);
        assert_eq!(img.get_pixel(0, 0), &WHITE);
        assert_eq!(img.get_pixel(25, 5), &WHITE);
    }

    #[test]
    fn test_rounded_rect_with_zero_radius_is_plain() {
        let mut img = white(10, 10);
        draw_rounded_rect_mut(&mut img, Rect::at(1, 1).of_size(3, 3), 0, BLUE);
        assert_eq!(img.get_pixel(1, 1), &BLUE);
        assert_eq!(img.get_pixel(3, 3), &BLUE);
        assert_eq!(img.get_pixel(4, 4), &WHITE);
    }

    #[test]
    fn test_with_font_path_errors() {
        let err = VisualizationConfig::with_font_path(Path::new("/nonexistent/font.ttf"))
            .err()
            .unwrap();
        assert!(matches!(err, PiiError::Io(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not a font").unwrap();
        let err = VisualizationConfig::with_font_path(file.path())
            .err()
            .unwrap();
        assert!(matches!(err, PiiError::ConfigError { .. }));
    }

    #[test]
    fn test_from_settings_applies_styling() {
        let settings = VisualizationSettings {
            font_path: Some("/nonexistent/font.ttf".into()),
            font_scale: 20.0,
            bbox_thickness: 3,
            bbox_color: [0, 128, 0],
        };
        let config = VisualizationConfig::from_settings(&settings);
        assert_eq!(config.font_scale, 20.0);
        assert_eq!(config.bbox_thickness, 3);
        assert_eq!(config.bbox_color, Rgb([0, 128, 0]));
        assert_eq!(config.label_padding, DEFAULT_LABEL_PADDING);
    }

    #[test]
    fn test_far_away_regions_do_not_overflow() {
        let mut img = white(30, 30);
        let regions = [
            DetectedRegion::new("X", 0.0, 0.0, 5.0e9, 10.0),
            DetectedRegion::new("X", 2.0e9, 2.0e9, 2.0e9, 2.0e9),
            DetectedRegion::new("X", -3.0e9, 12.0, 1.0e10, 4.0),
        ];
        let config = VisualizationConfig {
            bbox_thickness: i32::MAX,
            ..VisualizationConfig::default()
        };
        annotate_regions(&mut img, &regions, &config);
        annotate_regions(&mut img, &regions, &VisualizationConfig::with_system_font());

        assert_eq!(img.dimensions(), (30, 30));
        // top and left edges of the first region are still visible
        assert_eq!(img.get_pixel(15, 0), &BLUE);
        assert_eq!(img.get_pixel(0, 5), &BLUE);
    }

    #[test]
    fn test_clip_outline_keeps_visible_edges() {
        let rect = Rect::at(-5, 10).of_size(u32::MAX / 2, 5);
        let (clipped, rings) = clip_outline(rect, 2, (40, 40)).unwrap();
        assert_eq!(rings, 2);
        assert_eq!((clipped.left(), clipped.top()), (-2, 10));
        assert_eq!((clipped.right(), clipped.bottom()), (42, 14));

        assert!(clip_outline(Rect::at(100, 100).of_size(5, 5), 2, (40, 40)).is_none());
        assert!(clip_outline(Rect::at(0, 0).of_size(5, 5), 0, (40, 40)).is_none());
    }

    #[test]
    fn test_label_sits_above_region_corner() {
        let config = VisualizationConfig::with_system_font();
        if config.font.is_none() {
            return;
        }
        let is_ink = |p: &Rgb<u8>| p[0] == p[1] && p[1] == p[2] && p[0] < 200;
        let is_label = |p: &Rgb<u8>| p[0] == p[1] && p[1] == p[2] && p[0] < 255;

        let mut img = white(200, 80);
        let regions = [DetectedRegion::new("EMAIL", 20.0, 50.0, 80.0, 20.0)];
        annotate_regions(&mut img, &regions, &config);

        let pad = (config.label_padding * config.font_scale).round() as u32;
        let (text_x, baseline) = (20 - LABEL_OFFSET as u32, 50 - LABEL_OFFSET as u32);

        // left padding of the background, just above the baseline
        assert_eq!(img.get_pixel(text_x - pad / 2, baseline - 1), &LABEL_BACKGROUND_COLOR);

        let ink_rows: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| is_ink(p))
            .map(|(_, y, _)| y)
            .collect();
        assert!(!ink_rows.is_empty());
        assert!(ink_rows.iter().all(|&y| y <= baseline));

        assert!(
            img.enumerate_pixels()
                .filter(|(_, y, _)| *y > baseline + pad)
                .all(|(_, _, p)| !is_label(p))
        );
    }
}
