//! The PII verification renderer.
//!
//! [`ImagePiiVerifyEngine`] runs a detector over an image and returns an
//! annotated copy with an outline and an entity label for every detected
//! region. The caller's image is never modified and the returned image always
//! has the same dimensions as the input.

use crate::core::config::{AnalyzerOptions, OcrOptions};
use crate::core::errors::PiiResult;
use crate::detectors::OcrPiiDetector;
use crate::domain::PiiDetector;
use crate::utils::image::encode_png;
use crate::utils::visualization::{VisualizationConfig, annotate_regions};
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

/// Annotates images with the PII regions found by a detector.
///
/// The engine holds a shared reference to its detector and keeps no state
/// between calls, so one engine can verify any number of images.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use image::{Rgb, RgbImage};
/// use pii_verify::prelude::*;
///
/// # fn main() -> Result<(), PiiError> {
/// let detector = PrecomputedDetector::new(vec![
///     DetectedRegion::new("PHONE_NUMBER", 10.0, 10.0, 80.0, 20.0),
/// ]);
/// let engine = ImagePiiVerifyEngine::new(Some(Arc::new(detector)))
///     .with_visualization(VisualizationConfig::default());
///
/// let image = RgbImage::from_pixel(210, 70, Rgb([255, 255, 255]));
/// let annotated = engine.verify(&image, None, &AnalyzerOptions::default())?;
/// assert_eq!(annotated.dimensions(), image.dimensions());
/// assert_ne!(annotated, image);
/// # Ok(())
/// # }
/// ```
pub struct ImagePiiVerifyEngine {
    detector: Arc<dyn PiiDetector>,
    visualization: VisualizationConfig,
}

impl Default for ImagePiiVerifyEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImagePiiVerifyEngine {
    /// Creates an engine around `detector`.
    ///
    /// Without a detector, the default [`OcrPiiDetector`] (tesseract plus the
    /// built-in pattern analyzer) is used. Labels use a system font when one
    /// is found.
    pub fn new(detector: Option<Arc<dyn PiiDetector>>) -> Self {
        let detector =
            detector.unwrap_or_else(|| Arc::new(OcrPiiDetector::default()) as Arc<dyn PiiDetector>);
        Self {
            detector,
            visualization: VisualizationConfig::with_system_font(),
        }
    }

    /// Replaces the drawing configuration.
    pub fn with_visualization(mut self, visualization: VisualizationConfig) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn detector(&self) -> &Arc<dyn PiiDetector> {
        &self.detector
    }

    pub fn visualization(&self) -> &VisualizationConfig {
        &self.visualization
    }

    /// Returns a copy of `image` annotated with the detected PII regions.
    ///
    /// `ocr_options` are forwarded only to detectors that accept them; code
    /// symbol detectors receive `None`. `analyzer_options` are always
    /// forwarded unchanged. When nothing is detected the copy is returned
    /// untouched.
    ///
    /// # Errors
    ///
    /// Any error from the detector is returned as is.
    pub fn verify(
        &self,
        image: &RgbImage,
        ocr_options: Option<&OcrOptions>,
        analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<RgbImage> {
        let mut annotated = image.clone();
        let (width, height) = annotated.dimensions();

        let kind = self.detector.kind();
        let ocr_options = if kind.accepts_ocr_options() {
            ocr_options
        } else {
            if ocr_options.is_some() {
                debug!("Not forwarding OCR options to {:?} detector", kind);
            }
            None
        };

        let regions = self
            .detector
            .analyze(&annotated, ocr_options, analyzer_options)?;
        if regions.is_empty() {
            debug!("No PII detected in {}x{} image", width, height);
            return Ok(annotated);
        }

        debug!(
            "Annotating {} regions on {}x{} image",
            regions.len(),
            width,
            height
        );
        annotate_regions(&mut annotated, &regions, &self.visualization);
        debug_assert_eq!(annotated.dimensions(), (width, height));

        Ok(annotated)
    }

    /// Runs [`verify`](Self::verify) and encodes the result as PNG bytes.
    ///
    /// # Errors
    ///
    /// Detector errors as in `verify`, or an encoding error.
    pub fn verify_to_png(
        &self,
        image: &RgbImage,
        ocr_options: Option<&OcrOptions>,
        analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<Vec<u8>> {
        let annotated = self.verify(image, ocr_options, analyzer_options)?;
        encode_png(&annotated)
    }
}
