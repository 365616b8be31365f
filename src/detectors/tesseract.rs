//! [`OcrEngine`] backed by the `tesseract` command-line program.
//!
//! The image is encoded to PNG in memory and piped to
//! `tesseract stdin stdout [args] tsv`; the word rows of the TSV report are
//! turned into [`OcrWord`]s. Nothing touches the filesystem.

use crate::core::config::OcrOptions;
use crate::core::errors::{PiiError, PiiResult};
use crate::detectors::ocr::{OcrEngine, OcrWord};
use crate::utils::image::encode_png;
use image::RgbImage;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// TSV `level` value of word rows.
const WORD_LEVEL: &str = "5";

/// Number of columns in tesseract's TSV output.
const TSV_COLUMNS: usize = 12;

/// Runs the `tesseract` binary as a subprocess.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl Default for TesseractEngine {
    /// Uses `tesseract` from `PATH`.
    fn default() -> Self {
        Self::with_binary("tesseract")
    }
}

impl TesseractEngine {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &RgbImage, options: &OcrOptions) -> PiiResult<Vec<OcrWord>> {
        let args = tesseract_args(options)?;
        let png = encode_png(image)?;
        debug!(
            "Running {} on {}x{} image with args {:?}",
            self.binary.display(),
            image.width(),
            image.height(),
            args
        );

        let mut child = Command::new(&self.binary)
            .arg("stdin")
            .arg("stdout")
            .args(&args)
            .arg("tsv")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Tesseract reads all of stdin before producing output. It may also
        // exit early on bad arguments; the exit status then explains why.
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(&png)
        {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(e.into());
            }
            debug!("{} closed stdin early", self.binary.display());
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PiiError::ocr_error(
                &format!("tesseract exited with {}", output.status),
                std::io::Error::other(stderr),
            ));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        parse_tsv(&tsv)
    }
}

/// Translates OCR options into tesseract command-line arguments.
///
/// `lang`, `psm`, `oem` and `dpi` map to their flags, `config` is split on
/// whitespace and passed through, every other key becomes `-c key=value`.
fn tesseract_args(options: &OcrOptions) -> PiiResult<Vec<String>> {
    let mut args = Vec::new();

    for (key, value) in options.iter() {
        if key == "config" {
            let raw = options.get_str(key)?.unwrap_or_default();
            args.extend(raw.split_whitespace().map(str::to_string));
            continue;
        }

        let value = scalar_to_arg(key, value)?;
        match key.as_str() {
            "lang" => args.extend(["-l".to_string(), value]),
            "psm" | "oem" | "dpi" => args.extend([format!("--{}", key), value]),
            _ => args.extend(["-c".to_string(), format!("{}={}", key, value)]),
        }
    }

    Ok(args)
}

fn scalar_to_arg(key: &str, value: &serde_json::Value) -> PiiResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        other => Err(PiiError::config_error_with_context(
            key,
            &other.to_string(),
            "tesseract options must be strings, numbers or booleans",
        )),
    }
}

/// Parses tesseract TSV output, keeping word rows with visible text.
fn parse_tsv(tsv: &str) -> PiiResult<Vec<OcrWord>> {
    let mut words = Vec::new();

    // First line is the column header.
    for (line_no, line) in tsv.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if columns.len() < TSV_COLUMNS - 1 {
            return Err(PiiError::ocr_error(
                &format!("malformed tsv row {}", line_no + 1),
                std::io::Error::new(std::io::ErrorKind::InvalidData, line.to_string()),
            ));
        }
        if columns[0] != WORD_LEVEL {
            continue;
        }
        let text = columns.get(11).map(|t| t.trim()).unwrap_or_default();
        if text.is_empty() {
            continue;
        }

        let number = |index: usize| -> PiiResult<f32> {
            columns[index].trim().parse::<f32>().map_err(|e| {
                PiiError::ocr_error(&format!("malformed tsv row {}", line_no + 1), e)
            })
        };

        words.push(OcrWord {
            text: text.to_string(),
            left: number(6)?,
            top: number(7)?,
            width: number(8)?,
            height: number(9)?,
            confidence: number(10)?,
        });
    }

    Ok(words)
}
