//! Domain-level structures shared across PII verification.
//!
//! This module groups the detection result type and the detector capability
//! that the renderer is polymorphic over.

pub mod detector;
pub mod region;

pub use detector::{DetectorKind, PiiDetector};
pub use region::DetectedRegion;
