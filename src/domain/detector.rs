//! The detector capability the renderer is polymorphic over.

use crate::core::config::{AnalyzerOptions, OcrOptions};
use crate::core::errors::PiiResult;
use crate::domain::region::DetectedRegion;
use image::RgbImage;

/// Which family a detector belongs to.
///
/// The renderer only uses this to decide whether OCR options are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// OCR followed by text analysis.
    Ocr,
    /// Machine-readable code (QR, barcode) decoding followed by text analysis.
    CodeSymbol,
}

impl DetectorKind {
    /// Whether detectors of this kind take OCR configuration.
    pub fn accepts_ocr_options(self) -> bool {
        matches!(self, DetectorKind::Ocr)
    }
}

/// Locates PII-bearing regions in an image.
///
/// Implementations must be shareable across threads; the renderer holds them
/// behind an `Arc` and never mutates them.
pub trait PiiDetector: Send + Sync {
    /// The detector family. Defaults to [`DetectorKind::Ocr`].
    fn kind(&self) -> DetectorKind {
        DetectorKind::Ocr
    }

    /// Analyzes `image` and returns the detected regions in any order.
    ///
    /// `ocr_options` is always `None` when called by the renderer on a
    /// detector whose kind does not accept OCR options.
    fn analyze(
        &self,
        image: &RgbImage,
        ocr_options: Option<&OcrOptions>,
        analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<Vec<DetectedRegion>>;
}
