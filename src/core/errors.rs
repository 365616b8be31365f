//! Error types for PII verification.
//!
//! This module defines the errors that can occur while detecting and
//! annotating PII regions, including image loading errors, collaborator
//! (OCR, text analysis, symbol decoding) failures, rendering and encoding
//! errors, and configuration errors. It also provides helper constructors for
//! creating these errors with appropriate context.
//!
//! # Usage
//!
//! ```rust
//! use pii_verify::core::errors::{PiiError, ProcessingStage};
//!
//! let error = PiiError::ocr_error(
//!     "tesseract exited with status 1",
//!     std::io::Error::new(std::io::ErrorKind::Other, "Error opening data file"),
//! );
//! assert!(matches!(error, PiiError::Processing { kind: ProcessingStage::Ocr, .. }));
//!
//! let config_error = PiiError::config_error("score_threshold must be a number");
//! assert_eq!(config_error.to_string(), "configuration: score_threshold must be a number");
//! ```

use thiserror::Error;

/// Convenient result alias for PII verification operations.
pub type PiiResult<T> = Result<T, PiiError>;

/// Stage of the verification flow in which a processing error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Optical character recognition.
    Ocr,
    /// Text-based entity recognition.
    TextAnalysis,
    /// Decoding of machine-readable code symbols.
    SymbolDecoding,
    /// Encoding the annotated image into a byte buffer.
    Encoding,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Ocr => write!(f, "ocr"),
            ProcessingStage::TextAnalysis => write!(f, "text analysis"),
            ProcessingStage::SymbolDecoding => write!(f, "symbol decoding"),
            ProcessingStage::Encoding => write!(f, "encoding"),
        }
    }
}

/// Errors that can occur while detecting or visualizing PII.
#[derive(Error, Debug)]
pub enum PiiError {
    /// Error occurred while loading or decoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred in one of the processing stages.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error raised by a custom detector implementation.
    #[error("detector")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl PiiError {
    /// Creates a processing error for the OCR stage.
    pub fn ocr_error(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::processing_error(ProcessingStage::Ocr, context, error)
    }

    /// Creates a processing error for the text analysis stage.
    pub fn text_analysis(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::TextAnalysis, context, error)
    }

    /// Creates a processing error for the image encoding stage.
    pub fn encoding(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::processing_error(ProcessingStage::Encoding, context, error)
    }

    /// Creates a processing error for an arbitrary stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Wraps an error produced by a user-supplied detector.
    pub fn detector_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Detector(Box::new(error))
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending option and value.
    ///
    /// # Arguments
    ///
    /// * `field` - The option key where the error occurred.
    /// * `value` - The rejected value, rendered as text.
    /// * `reason` - The reason the value was rejected.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }
}

impl From<image::ImageError> for PiiError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<serde_json::Error> for PiiError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_processing_error_display_names_stage() {
        let err = PiiError::text_analysis(
            "pattern compile",
            std::io::Error::new(std::io::ErrorKind::InvalidData, "bad"),
        );
        assert_eq!(err.to_string(), "text analysis failed: pattern compile");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_with_context() {
        let err = PiiError::config_error_with_context("psm", "[1]", "expected a scalar");
        assert_eq!(
            err.to_string(),
            "configuration: Configuration error in field 'psm' with value '[1]': expected a scalar"
        );
    }

    #[test]
    fn test_detector_error_keeps_source() {
        let err = PiiError::detector_error(std::io::Error::other("model missing"));
        assert_eq!(err.to_string(), "detector");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("model missing"));
    }

    #[test]
    fn test_json_error_becomes_config_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(PiiError::from(json_err), PiiError::ConfigError { .. }));
    }
}
