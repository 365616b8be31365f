//! Replays detections produced earlier.

use crate::core::config::{AnalyzerOptions, OcrOptions};
use crate::core::errors::PiiResult;
use crate::domain::{DetectedRegion, PiiDetector};
use image::RgbImage;
use std::path::Path;
use tracing::info;

/// Detector returning a fixed list of regions, whatever the image.
///
/// Useful to re-check saved detector output: serialize the regions as a JSON
/// array and load them with [`PrecomputedDetector::from_json_file`].
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetector {
    regions: Vec<DetectedRegion>,
}

impl PrecomputedDetector {
    pub fn new(regions: Vec<DetectedRegion>) -> Self {
        Self { regions }
    }

    /// Parses a JSON array of regions.
    pub fn from_json_str(json: &str) -> PiiResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads a JSON array of regions from a file.
    pub fn from_json_file(path: &Path) -> PiiResult<Self> {
        let detector = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(
            "Loaded {} regions from {}",
            detector.regions.len(),
            path.display()
        );
        Ok(detector)
    }

    pub fn regions(&self) -> &[DetectedRegion] {
        &self.regions
    }
}

impl PiiDetector for PrecomputedDetector {
    fn analyze(
        &self,
        _image: &RgbImage,
        _ocr_options: Option<&OcrOptions>,
        _analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<Vec<DetectedRegion>> {
        Ok(self.regions.clone())
    }
}
