//! The core module of PII verification.
//!
//! This module contains the fundamental building blocks shared by detectors
//! and the renderer:
//! - Configuration and option maps
//! - Constants used for drawing and option handling
//! - Error handling
//!
//! It also re-exports the commonly used types for convenience.

#[macro_use]
pub mod macros;
pub mod config;
pub mod constants;
pub mod errors;

pub use config::{AnalyzerOptions, OcrOptions, VerifyConfig, VisualizationSettings};
pub use constants::*;
pub use errors::{PiiError, PiiResult, ProcessingStage};
