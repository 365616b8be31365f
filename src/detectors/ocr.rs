//! OCR-plus-text-analysis detection.
//!
//! [`OcrPiiDetector`] runs an [`OcrEngine`] over the image, joins the
//! recognized words into one text, hands that text to a [`TextAnalyzer`] and
//! maps every reported span back onto the boxes of the words it covers.

use crate::core::config::{AnalyzerOptions, OcrOptions};
use crate::core::errors::PiiResult;
use crate::detectors::patterns::{PatternAnalyzer, TextAnalyzer, TextSpan};
use crate::detectors::tesseract::TesseractEngine;
use crate::domain::{DetectedRegion, DetectorKind, PiiDetector};
use image::RgbImage;
use std::ops::Range;
use tracing::debug;

/// A single word recognized by an OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Engine-reported confidence. Tesseract uses 0..100, and -1 for none.
    pub confidence: f32,
}

/// Extracts words and their positions from an image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RgbImage, options: &OcrOptions) -> PiiResult<Vec<OcrWord>>;
}

/// Detector that combines OCR with text-based entity recognition.
///
/// # Examples
///
/// ```rust,no_run
/// use pii_verify::detectors::{OcrPiiDetector, PatternAnalyzer, TesseractEngine};
///
/// let detector = OcrPiiDetector::new(
///     Box::new(TesseractEngine::with_binary("/usr/local/bin/tesseract")),
///     Box::new(PatternAnalyzer::default()),
/// );
/// ```
pub struct OcrPiiDetector {
    ocr: Box<dyn OcrEngine>,
    analyzer: Box<dyn TextAnalyzer>,
}

impl Default for OcrPiiDetector {
    /// Tesseract on `PATH` plus the built-in pattern analyzer.
    fn default() -> Self {
        Self::new(
            Box::new(TesseractEngine::default()),
            Box::new(PatternAnalyzer::default()),
        )
    }
}

impl OcrPiiDetector {
    pub fn new(ocr: Box<dyn OcrEngine>, analyzer: Box<dyn TextAnalyzer>) -> Self {
        Self { ocr, analyzer }
    }
}

impl PiiDetector for OcrPiiDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Ocr
    }

    fn analyze(
        &self,
        image: &RgbImage,
        ocr_options: Option<&OcrOptions>,
        analyzer_options: &AnalyzerOptions,
    ) -> PiiResult<Vec<DetectedRegion>> {
        let mut ocr_options = ocr_options.cloned().unwrap_or_default();
        let threshold = ocr_options.take_ocr_threshold()?;

        let words: Vec<OcrWord> = self
            .ocr
            .recognize(image, &ocr_options)?
            .into_iter()
            .filter(|w| !w.text.trim().is_empty())
            .filter(|w| threshold.is_none_or(|t| w.confidence >= t))
            .collect();
        debug!("OCR kept {} words", words.len());

        let (text, ranges) = join_words(&words);
        let spans = self.analyzer.analyze(&text, analyzer_options)?;

        Ok(map_spans_to_regions(&words, &ranges, &spans))
    }
}

/// Joins word texts with single spaces, returning each word's byte range.
fn join_words(words: &[OcrWord]) -> (String, Vec<Range<usize>>) {
    let mut text = String::new();
    let mut ranges = Vec::with_capacity(words.len());

    for word in words {
        if !text.is_empty() {
            text.push(' ');
        }
        let start = text.len();
        text.push_str(&word.text);
        ranges.push(start..text.len());
    }

    (text, ranges)
}

/// Emits one region per (span, overlapping word) pair, in span order.
fn map_spans_to_regions(
    words: &[OcrWord],
    ranges: &[Range<usize>],
    spans: &[TextSpan],
) -> Vec<DetectedRegion> {
    spans
        .iter()
        .flat_map(|span| {
            words
                .iter()
                .zip(ranges)
                .filter(move |(_, range)| range.start < span.end && span.start < range.end)
                .map(move |(word, _)| {
                    DetectedRegion::new(
                        span.entity_type.clone(),
                        word.left,
                        word.top,
                        word.width,
                        word.height,
                    )
                    .with_score(span.score)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::PiiError;
    use std::sync::Mutex;

    fn word(text: &str, left: f32, confidence: f32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            left,
            top: 5.0,
            width: 10.0 * text.len() as f32,
            height: 12.0,
            confidence,
        }
    }

    struct FakeOcr {
        words: Vec<OcrWord>,
        seen_options: Mutex<Option<OcrOptions>>,
    }

    impl FakeOcr {
        fn new(words: Vec<OcrWord>) -> Self {
            Self {
                words,
                seen_options: Mutex::new(None),
            }
        }
    }

    impl OcrEngine for FakeOcr {
        fn recognize(&self, _image: &RgbImage, options: &OcrOptions) -> PiiResult<Vec<OcrWord>> {
            *self.seen_options.lock().unwrap() = Some(options.clone());
            Ok(self.words.clone())
        }
    }

    impl OcrEngine for std::sync::Arc<FakeOcr> {
        fn recognize(&self, image: &RgbImage, options: &OcrOptions) -> PiiResult<Vec<OcrWord>> {
            self.as_ref().recognize(image, options)
        }
    }

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image: &RgbImage, _options: &OcrOptions) -> PiiResult<Vec<OcrWord>> {
            Err(PiiError::invalid_input("unreadable image"))
        }
    }

    fn image() -> RgbImage {
        RgbImage::new(200, 40)
    }

    #[test]
    fn test_join_words_ranges() {
        let words = vec![word("Call", 0.0, 90.0), word("me", 50.0, 90.0)];
        let (text, ranges) = join_words(&words);
        assert_eq!(text, "Call me");
        assert_eq!(ranges, vec![0..4, 5..7]);
    }

    #[test]
    fn test_maps_span_to_word_box() {
        let detector = OcrPiiDetector::new(
            Box::new(FakeOcr::new(vec![
                word("Call", 0.0, 95.0),
                word("555-123-4567", 50.0, 95.0),
                word("today", 180.0, 95.0),
            ])),
            Box::new(PatternAnalyzer::default()),
        );

        let regions = detector
            .analyze(&image(), None, &AnalyzerOptions::default())
            .unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].entity_type, "PHONE_NUMBER");
        assert_eq!(regions[0].left, 50.0);
        assert_eq!(regions[0].width, 120.0);
        assert_eq!(regions[0].score, 0.4);
    }

    #[test]
    fn test_multi_word_span_yields_region_per_word() {
        let detector = OcrPiiDetector::new(
            Box::new(FakeOcr::new(vec![
                word("card", 0.0, 95.0),
                word("4111", 50.0, 95.0),
                word("1111", 100.0, 95.0),
                word("1111", 150.0, 95.0),
                word("1111", 200.0, 95.0),
            ])),
            Box::new(PatternAnalyzer::default()),
        );

        let regions = detector
            .analyze(&image(), None, &AnalyzerOptions::default())
            .unwrap();

        let lefts: Vec<f32> = regions.iter().map(|r| r.left).collect();
        assert_eq!(lefts, vec![50.0, 100.0, 150.0, 200.0]);
        assert!(regions.iter().all(|r| r.entity_type == "CREDIT_CARD"));
    }

    #[test]
    fn test_ocr_threshold_drops_words_and_is_not_forwarded() {
        let ocr = std::sync::Arc::new(FakeOcr::new(vec![
            word("a@b.io", 0.0, 30.0),
            word("c@d.io", 80.0, 90.0),
        ]));
        let detector = OcrPiiDetector::new(
            Box::new(ocr.clone()),
            Box::new(PatternAnalyzer::default()),
        );
        let options = OcrOptions::new().with("ocr_threshold", 50).with("lang", "eng");

        let regions = detector
            .analyze(&image(), Some(&options), &AnalyzerOptions::default())
            .unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].left, 80.0);

        let seen = ocr.seen_options.lock().unwrap().clone().unwrap();
        assert!(!seen.contains_key("ocr_threshold"));
        assert!(seen.contains_key("lang"));
    }

    #[test]
    fn test_blank_words_are_ignored() {
        let detector = OcrPiiDetector::new(
            Box::new(FakeOcr::new(vec![word("  ", 0.0, 95.0)])),
            Box::new(PatternAnalyzer::default()),
        );
        let regions = detector
            .analyze(&image(), None, &AnalyzerOptions::default())
            .unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_ocr_error_propagates() {
        let detector = OcrPiiDetector::new(Box::new(FailingOcr), Box::new(PatternAnalyzer::default()));
        let err = detector
            .analyze(&image(), None, &AnalyzerOptions::default())
            .unwrap_err();
        assert!(matches!(err, PiiError::InvalidInput { .. }));
    }

    #[test]
    fn test_analyzer_error_propagates() {
        let detector = OcrPiiDetector::new(
            Box::new(FakeOcr::new(vec![word("hi", 0.0, 95.0)])),
            Box::new(PatternAnalyzer::default()),
        );
        let options = AnalyzerOptions::new().with("language", "fr");
        let err = detector.analyze(&image(), None, &options).unwrap_err();
        assert!(matches!(err, PiiError::ConfigError { .. }));
    }
}
