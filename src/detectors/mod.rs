//! Detector implementations.
//!
//! - [`OcrPiiDetector`]: OCR plus text analysis, the renderer's default
//! - [`CodeSymbolDetector`]: analysis of decoded QR/barcode payloads
//! - [`PrecomputedDetector`]: replays saved detections
//!
//! The collaborators they compose ([`OcrEngine`], [`TextAnalyzer`],
//! [`SymbolDecoder`]) are traits so real engines can be plugged in.

pub mod ocr;
pub mod patterns;
pub mod precomputed;
pub mod symbol;
pub mod tesseract;

pub use ocr::{OcrEngine, OcrPiiDetector, OcrWord};
pub use patterns::{PatternAnalyzer, TextAnalyzer, TextSpan};
pub use precomputed::PrecomputedDetector;
pub use symbol::{CodeSymbolDetector, DecodedSymbol, SymbolDecoder};
pub use tesseract::TesseractEngine;
