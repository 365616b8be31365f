//! Configuration for PII verification.
//!
//! This module holds the option maps forwarded to detectors and the
//! file-backed configuration used by the command-line front end:
//!
//! - [`OcrOptions`]: OCR engine settings, opaque to the renderer
//! - [`AnalyzerOptions`]: free-form options forwarded to the detector's analyze step
//! - [`VerifyConfig`]: JSON configuration bundling both plus visualization settings

use crate::core::constants::{
    DEFAULT_BBOX_COLOR, DEFAULT_BBOX_THICKNESS, DEFAULT_FONT_SCALE, DEFAULT_LANGUAGE,
    OCR_THRESHOLD_KEY,
};
use crate::core::errors::{PiiError, PiiResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// OCR engine configuration.
///
/// Keys and values are defined by the OCR engine in use. The only key with
/// a meaning outside the engine is `ocr_threshold`, the minimum word
/// confidence kept by [`crate::detectors::OcrPiiDetector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrOptions(BTreeMap<String, serde_json::Value>);

impl_option_map!(OcrOptions);

impl OcrOptions {
    /// Removes `ocr_threshold` from the map and returns it.
    pub fn take_ocr_threshold(&mut self) -> PiiResult<Option<f32>> {
        let threshold = self.get_f32(OCR_THRESHOLD_KEY)?;
        self.remove(OCR_THRESHOLD_KEY);
        Ok(threshold)
    }
}

/// Free-form analyzer options, forwarded verbatim to the detector.
///
/// The typed accessors cover the keys understood by the built-in
/// [`crate::detectors::PatternAnalyzer`]; other analyzers may read any key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzerOptions(BTreeMap<String, serde_json::Value>);

impl_option_map!(AnalyzerOptions);

impl AnalyzerOptions {
    /// Language of the analyzed text, `"en"` when unset.
    pub fn language(&self) -> PiiResult<&str> {
        Ok(self.get_str("language")?.unwrap_or(DEFAULT_LANGUAGE))
    }

    /// Entity types to report. `None` means all supported entities.
    pub fn entities(&self) -> PiiResult<Option<Vec<String>>> {
        self.get_str_list("entities")
    }

    /// Minimum score of a reported span, `0.0` when unset.
    pub fn score_threshold(&self) -> PiiResult<f32> {
        Ok(self.get_f32("score_threshold")?.unwrap_or(0.0))
    }

    /// Matched texts that must never be reported.
    pub fn allow_list(&self) -> PiiResult<Vec<String>> {
        Ok(self.get_str_list("allow_list")?.unwrap_or_default())
    }
}

/// File-level visualization settings.
///
/// The loaded font lives in [`crate::utils::visualization::VisualizationConfig`];
/// this struct only names where to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationSettings {
    /// Font file for labels. The system font is used when unset.
    pub font_path: Option<PathBuf>,
    /// Label font size in pixels.
    pub font_scale: f32,
    /// Box outline thickness in pixels.
    pub bbox_thickness: i32,
    /// Box outline color as `[r, g, b]`.
    pub bbox_color: [u8; 3],
}

impl Default for VisualizationSettings {
    fn default() -> Self {
        Self {
            font_path: None,
            font_scale: DEFAULT_FONT_SCALE,
            bbox_thickness: DEFAULT_BBOX_THICKNESS,
            bbox_color: DEFAULT_BBOX_COLOR,
        }
    }
}

/// Top-level configuration file.
///
/// ```rust
/// use pii_verify::core::config::VerifyConfig;
///
/// let config = VerifyConfig::from_json_str(r#"
/// {
///   "ocr": { "lang": "eng", "ocr_threshold": 40 },
///   "analyzer": { "entities": ["PHONE_NUMBER"] },
///   "visualization": { "bbox_thickness": 1 }
/// }
/// "#).unwrap();
/// assert_eq!(config.visualization.bbox_thickness, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// OCR options. `None` leaves the OCR engine on its defaults.
    pub ocr: Option<OcrOptions>,
    /// Options forwarded to the detector's analyze step.
    pub analyzer: AnalyzerOptions,
    /// Label and box styling.
    pub visualization: VisualizationSettings,
}

impl VerifyConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> PiiResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_file(path: &Path) -> PiiResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> PiiResult<()> {
        let vis = &self.visualization;
        if !(vis.font_scale.is_finite() && vis.font_scale > 0.0) {
            return Err(PiiError::config_error_with_context(
                "visualization.font_scale",
                &vis.font_scale.to_string(),
                "must be a positive number",
            ));
        }
        if vis.bbox_thickness < 0 {
            return Err(PiiError::config_error_with_context(
                "visualization.bbox_thickness",
                &vis.bbox_thickness.to_string(),
                "must not be negative",
            ));
        }
        // Surface malformed well-known keys at load time rather than per image.
        self.analyzer.language()?;
        self.analyzer.entities()?;
        self.analyzer.score_threshold()?;
        self.analyzer.allow_list()?;
        if let Some(ocr) = &self.ocr {
            ocr.get_f32(OCR_THRESHOLD_KEY)?;
        }
        Ok(())
    }
}
