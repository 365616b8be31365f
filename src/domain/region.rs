//! Detected PII regions.

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

fn default_score() -> f32 {
    1.0
}

/// A PII-bearing region located by a detector.
///
/// Coordinates are in pixels of the analyzed image. Regions are expected to
/// lie within the image, but nothing enforces it; drawing clips whatever
/// falls outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    /// Entity label, e.g. `PHONE_NUMBER`.
    pub entity_type: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Detector confidence in `[0, 1]`.
    #[serde(default = "default_score")]
    pub score: f32,
}

impl DetectedRegion {
    /// Creates a region with a score of 1.0.
    pub fn new(
        entity_type: impl Into<String>,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            left,
            top,
            width,
            height,
            score: default_score(),
        }
    }

    /// Sets the confidence score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Converts the region to an integer rectangle for drawing.
    ///
    /// Returns `None` when the rounded width or height is zero, or when any
    /// coordinate is not finite. Coordinates beyond the `i32` range saturate
    /// and the size is shortened so the far edge stays representable.
    pub fn to_rect(&self) -> Option<Rect> {
        if ![self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }

        let (left, width) = saturating_span(self.left, self.width)?;
        let (top, height) = saturating_span(self.top, self.height)?;
        Some(Rect::at(left, top).of_size(width, height))
    }
}

/// Rounds a start/length pair so that `start + length` fits in `i32`.
fn saturating_span(start: f32, length: f32) -> Option<(i32, u32)> {
    let start = start.round() as i32;
    let length = length.max(0.0).round() as i64;
    let room = i64::from(i32::MAX) - i64::from(start);
    let length = length.min(room).min(i64::from(i32::MAX));
    (length > 0).then_some((start, length as u32))
}
