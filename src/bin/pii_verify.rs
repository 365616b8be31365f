//! PII verification command-line tool.
//!
//! Draws boxes and entity labels over the PII found in an image and writes
//! the annotated copy to disk.
//!
//! # Usage
//!
//! ```bash
//! pii-verify [OPTIONS] --output <OUTPUT> <IMAGE>
//! ```
//!
//! # Example
//!
//! ```bash
//! # run tesseract + pattern analysis
//! pii-verify --lang eng --ocr-threshold 40 -o scan.verified.png scan.png
//!
//! # re-check detections saved earlier as a JSON array of regions
//! pii-verify --regions scan.regions.json -o scan.verified.png scan.png
//! ```

use clap::Parser;
use pii_verify::core::config::VerifyConfig;
use pii_verify::detectors::{OcrPiiDetector, PatternAnalyzer, PrecomputedDetector, TesseractEngine};
use pii_verify::domain::PiiDetector;
use pii_verify::utils::{VisualizationConfig, load_image};
use pii_verify::verify::ImagePiiVerifyEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Command-line arguments for pii-verify
#[derive(Parser)]
#[command(name = "pii-verify")]
#[command(about = "Annotates detected PII regions in an image for visual verification")]
struct Args {
    /// Path to the input image
    image: PathBuf,

    /// Where to write the annotated image (format from extension)
    #[arg(short, long)]
    output: PathBuf,

    /// JSON array of saved detections to draw instead of running OCR
    #[arg(long)]
    regions: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Font file for labels (overrides the configuration file)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Tesseract language, e.g. 'eng' or 'eng+deu'
    #[arg(long)]
    lang: Option<String>,

    /// Comma-separated entity types to report
    #[arg(long, value_delimiter = ',')]
    entities: Vec<String>,

    /// Minimum OCR word confidence (0-100)
    #[arg(long)]
    ocr_threshold: Option<f32>,

    /// Minimum entity score (0-1)
    #[arg(long)]
    score_threshold: Option<f32>,

    /// Path to the tesseract binary
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pii_verify::utils::init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VerifyConfig::from_file(path)?,
        None => VerifyConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    if !args.image.exists() {
        error!("Image file not found: {}", args.image.display());
        return Err("Image file not found".into());
    }
    let image = load_image(&args.image)?;
    info!(
        "Loaded {} ({}x{})",
        args.image.display(),
        image.width(),
        image.height()
    );

    let detector: Arc<dyn PiiDetector> = match &args.regions {
        Some(path) => Arc::new(PrecomputedDetector::from_json_file(path)?),
        None => Arc::new(OcrPiiDetector::new(
            Box::new(TesseractEngine::with_binary(&args.tesseract)),
            Box::new(PatternAnalyzer::default()),
        )),
    };

    let engine = ImagePiiVerifyEngine::new(Some(detector))
        .with_visualization(VisualizationConfig::from_settings(&config.visualization));

    let start = Instant::now();
    let annotated = engine.verify(&image, config.ocr.as_ref(), &config.analyzer)?;
    info!("Verification finished in {:?}", start.elapsed());

    annotated.save(&args.output)?;
    info!("Annotated image saved to: {}", args.output.display());
    Ok(())
}

/// Folds command-line flags into the file configuration.
fn apply_overrides(config: &mut VerifyConfig, args: &Args) {
    if let Some(font) = &args.font {
        config.visualization.font_path = Some(font.clone());
    }
    if let Some(lang) = &args.lang {
        config
            .ocr
            .get_or_insert_with(Default::default)
            .insert("lang", lang.as_str());
    }
    if let Some(threshold) = args.ocr_threshold {
        config
            .ocr
            .get_or_insert_with(Default::default)
            .insert("ocr_threshold", threshold);
    }
    if !args.entities.is_empty() {
        config.analyzer.insert("entities", args.entities.clone());
    }
    if let Some(threshold) = args.score_threshold {
        config.analyzer.insert("score_threshold", threshold);
    }
}
