//! # PII Verify
//!
//! Draws bounding boxes and entity-type labels over the PII regions a
//! detector finds in an image, so a human can check at a glance whether the
//! detection was right.
//!
//! ## Features
//!
//! - Annotated copy of the input image, same dimensions, input untouched
//! - Pluggable detectors behind the [`domain::PiiDetector`] trait
//! - Default detector: tesseract OCR plus a pattern-based text analyzer
//! - Code-symbol (QR/barcode) detector for injected symbol decoders
//! - Replay of saved detections from JSON
//!
//! ## Modules
//!
//! * [`core`] - Errors, option maps, configuration and constants
//! * [`domain`] - Detected regions and the detector trait
//! * [`detectors`] - Detector implementations and their collaborators
//! * [`utils`] - Image loading/encoding, drawing and logging setup
//! * [`verify`] - The verification renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_verify::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = load_image(Path::new("scan.png"))?;
//!
//! // Tesseract on PATH plus the built-in pattern analyzer.
//! let engine = ImagePiiVerifyEngine::default();
//! let ocr = OcrOptions::new().with("lang", "eng").with("ocr_threshold", 40);
//! let analyzer = AnalyzerOptions::new().with("score_threshold", 0.4);
//!
//! let annotated = engine.verify(&image, Some(&ocr), &analyzer)?;
//! annotated.save("scan.verified.png")?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod detectors;
pub mod domain;
pub mod utils;
pub mod verify;

/// Prelude module for convenient imports.
///
/// ```rust
/// use pii_verify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{AnalyzerOptions, OcrOptions, PiiError, PiiResult, VerifyConfig};
    pub use crate::detectors::{
        CodeSymbolDetector, OcrPiiDetector, PatternAnalyzer, PrecomputedDetector, TesseractEngine,
    };
    pub use crate::domain::{DetectedRegion, DetectorKind, PiiDetector};
    pub use crate::utils::{VisualizationConfig, load_image};
    pub use crate::verify::ImagePiiVerifyEngine;
}
