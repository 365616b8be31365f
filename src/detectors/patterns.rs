//! Pattern-based text analysis.
//!
//! [`PatternAnalyzer`] is a small regex-driven [`TextAnalyzer`] covering a
//! handful of common English PII formats. It exists so the default OCR
//! detector works out of the box; callers with a real entity recognizer plug
//! it in through the [`TextAnalyzer`] trait instead.

use crate::core::config::AnalyzerOptions;
use crate::core::constants::DEFAULT_LANGUAGE;
use crate::core::errors::{PiiError, PiiResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A PII span found in analyzed text.
///
/// `start` and `end` are byte offsets into the analyzed string.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Finds PII spans in plain text.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, options: &AnalyzerOptions) -> PiiResult<Vec<TextSpan>>;
}

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid")
});

static CREDIT_CARD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d[ -]?){12,18}\d\b").expect("credit card pattern is valid")
});

static US_SSN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern is valid"));

static IP_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|1?\d?\d)\b")
        .expect("ip address pattern is valid")
});

static PHONE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b")
        .expect("phone number pattern is valid")
});

/// Luhn checksum over the digits of `text`, ignoring separators.
fn luhn_valid(text: &str) -> bool {
    let digits: Vec<u32> = text.chars().filter_map(|c| c.to_digit(10)).collect();
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Rejects SSNs with never-issued area, group or serial numbers.
fn ssn_valid(text: &str) -> bool {
    let mut parts = text.split('-');
    let (Some(area), Some(group), Some(serial)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

struct PatternRecognizer {
    entity_type: String,
    regex: Regex,
    score: f32,
    validate: Option<fn(&str) -> bool>,
}

/// Regex-based [`TextAnalyzer`] for English text.
///
/// Built-in entities: `EMAIL_ADDRESS`, `CREDIT_CARD`, `US_SSN`, `IP_ADDRESS`,
/// `PHONE_NUMBER`. Understood options: `language`, `entities`,
/// `score_threshold`, `allow_list`.
pub struct PatternAnalyzer {
    recognizers: Vec<PatternRecognizer>,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        let builtin = |entity: &str,
                       regex: &Lazy<Regex>,
                       score: f32,
                       validate: Option<fn(&str) -> bool>| PatternRecognizer {
            entity_type: entity.to_string(),
            regex: Regex::clone(regex),
            score,
            validate,
        };

        Self {
            recognizers: vec![
                builtin("EMAIL_ADDRESS", &EMAIL_REGEX, 1.0, None),
                builtin("CREDIT_CARD", &CREDIT_CARD_REGEX, 1.0, Some(luhn_valid)),
                builtin("US_SSN", &US_SSN_REGEX, 0.5, Some(ssn_valid)),
                builtin("IP_ADDRESS", &IP_ADDRESS_REGEX, 0.6, None),
                builtin("PHONE_NUMBER", &PHONE_NUMBER_REGEX, 0.4, None),
            ],
        }
    }
}

impl PatternAnalyzer {
    /// Creates an analyzer with no recognizers.
    pub fn empty() -> Self {
        Self {
            recognizers: Vec::new(),
        }
    }

    /// Adds a custom pattern for `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns a text analysis error if `pattern` is not a valid regex.
    pub fn with_pattern(
        mut self,
        entity_type: impl Into<String>,
        pattern: &str,
        score: f32,
    ) -> PiiResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| PiiError::text_analysis(&format!("invalid pattern '{}'", pattern), e))?;
        self.recognizers.push(PatternRecognizer {
            entity_type: entity_type.into(),
            regex,
            score,
            validate: None,
        });
        Ok(self)
    }

    /// Entity types this analyzer can report, in recognizer order.
    pub fn supported_entities(&self) -> Vec<&str> {
        self.recognizers
            .iter()
            .map(|r| r.entity_type.as_str())
            .collect()
    }
}

impl TextAnalyzer for PatternAnalyzer {
    fn analyze(&self, text: &str, options: &AnalyzerOptions) -> PiiResult<Vec<TextSpan>> {
        let language = options.language()?;
        if language != DEFAULT_LANGUAGE {
            return Err(PiiError::config_error_with_context(
                "language",
                language,
                "no pattern recognizers for this language",
            ));
        }
        let entities = options.entities()?;
        let score_threshold = options.score_threshold()?;
        let allow_list = options.allow_list()?;

        let mut spans = Vec::new();
        for recognizer in &self.recognizers {
            if let Some(wanted) = &entities
                && !wanted.iter().any(|e| *e == recognizer.entity_type)
            {
                continue;
            }
            if recognizer.score < score_threshold {
                continue;
            }

            for m in recognizer.regex.find_iter(text) {
                let matched = m.as_str();
                if recognizer.validate.is_some_and(|validate| !validate(matched)) {
                    continue;
                }
                if allow_list.iter().any(|allowed| allowed == matched) {
                    continue;
                }
                spans.push(TextSpan {
                    entity_type: recognizer.entity_type.clone(),
                    start: m.start(),
                    end: m.end(),
                    score: recognizer.score,
                });
            }
        }

        let mut spans = remove_contained(spans);
        spans.sort_by_key(|s| (s.start, s.end));
        debug!("Pattern analyzer found {} spans", spans.len());
        Ok(spans)
    }
}

/// Drops spans lying inside another span with an equal or higher score.
///
/// Of two spans with the same range and score, the earlier one survives.
fn remove_contained(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    let keep: Vec<bool> = spans
        .iter()
        .enumerate()
        .map(|(i, a)| {
            !spans.iter().enumerate().any(|(j, b)| {
                i != j
                    && b.start <= a.start
                    && a.end <= b.end
                    && b.score >= a.score
                    && ((b.start, b.end) != (a.start, a.end) || j < i)
            })
        })
        .collect();

    spans
        .into_iter()
        .zip(keep)
        .filter_map(|(span, keep)| keep.then_some(span))
        .collect()
}
