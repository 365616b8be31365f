//! Machine-readable code (QR, barcode) detection.

use crate::core::config::{AnalyzerOptions, OcrOptions};
use crate::core::errors::PiiResult;
use crate::detectors::patterns::TextAnalyzer;
use crate::domain::{DetectedRegion, DetectorKind, PiiDetector};
use image::RgbImage;
use tracing::debug;

/// A decoded code symbol and where it sits in the image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Payload of the symbol.
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Locates and decodes code symbols in an image.
pub trait SymbolDecoder: Send + Sync {
    fn decode(&self, image: &RgbImage) -> PiiResult<Vec<DecodedSymbol>>;
}

/// Detector that analyzes the payloads of code symbols for PII.
///
/// Every span found in a symbol's payload is reported with the box of the
/// whole symbol. OCR options never reach this detector.
pub struct CodeSymbolDetector {
    decoder: Box<dyn SymbolDecoder>,
    analyzer: Box<dyn TextAnalyzer>,
}

impl CodeSymbolDetector {
    pub fn new(decoder: Box<dyn SymbolDecoder>, analyzer: Box<dyn TextAnalyzer>) -> Self {
        Self { decoder, analyzer }
    }
}

impl PiiDetector for CodeSymbolDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::CodeSymbol
    }

    fn analyze(
        &self,
        image: &RgbImage,
        _ocr_options: Option<&OcrOptions>,
        analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<Vec<DetectedRegion>> {
        let symbols = self.decoder.decode(image)?;
        debug!("Decoded {} code symbols", symbols.len());

        let mut regions = Vec::new();
        for symbol in &symbols {
            for span in self.analyzer.analyze(&symbol.text, analyzer_options)? {
                regions.push(
                    DetectedRegion::new(
                        span.entity_type,
                        symbol.left,
                        symbol.top,
                        symbol.width,
                        symbol.height,
                    )
                    .with_score(span.score),
                );
            }
        }
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::PiiError;
    use crate::detectors::patterns::PatternAnalyzer;

    struct FakeDecoder(Vec<DecodedSymbol>);

    impl SymbolDecoder for FakeDecoder {
        fn decode(&self, _image: &RgbImage) -> PiiResult<Vec<DecodedSymbol>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDecoder;

    impl SymbolDecoder for BrokenDecoder {
        fn decode(&self, _image: &RgbImage) -> PiiResult<Vec<DecodedSymbol>> {
            Err(PiiError::processing_error(
                crate::core::errors::ProcessingStage::SymbolDecoding,
                "finder patterns not found",
                std::io::Error::other("no symbol"),
            ))
        }
    }

    fn symbol(text: &str, left: f32) -> DecodedSymbol {
        DecodedSymbol {
            text: text.to_string(),
            left,
            top: 4.0,
            width: 50.0,
            height: 50.0,
        }
    }

    #[test]
    fn test_kind_is_code_symbol() {
        let detector = CodeSymbolDetector::new(
            Box::new(FakeDecoder(Vec::new())),
            Box::new(PatternAnalyzer::default()),
        );
        assert_eq!(detector.kind(), DetectorKind::CodeSymbol);
    }

    #[test]
    fn test_spans_use_symbol_box() {
        let detector = CodeSymbolDetector::new(
            Box::new(FakeDecoder(vec![
                symbol("mailto:jane@example.com tel:555-123-4567", 10.0),
                symbol("https://example.com/menu", 90.0),
            ])),
            Box::new(PatternAnalyzer::default()),
        );

        let regions = detector
            .analyze(&RgbImage::new(160, 60), None, &AnalyzerOptions::default())
            .unwrap();

        let types: Vec<&str> = regions.iter().map(|r| r.entity_type.as_str()).collect();
        assert_eq!(types, vec!["EMAIL_ADDRESS", "PHONE_NUMBER"]);
        assert!(regions.iter().all(|r| r.left == 10.0 && r.width == 50.0));
    }

    #[test]
    fn test_decoder_error_propagates() {
        let detector =
            CodeSymbolDetector::new(Box::new(BrokenDecoder), Box::new(PatternAnalyzer::default()));
        let err = detector
            .analyze(&RgbImage::new(8, 8), None, &AnalyzerOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "symbol decoding failed: finder patterns not found");
    }
}
