//! Utility functions for PII verification.
//!
//! This module provides image loading and encoding helpers, the drawing code
//! that renders detected regions, and logging setup.

pub mod image;
pub mod visualization;

pub use self::image::{encode_png, load_image};
pub use visualization::{VisualizationConfig, annotate_regions};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
