use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::TranscriptError;

// @module: Word-level transcript data shared by pacing and subtitles

/// One transcribed token with its timing in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Surface form, may carry punctuation
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Duration of the word in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Recognizer output shapes accepted on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Flat(Vec<Word>),
    Segmented { segments: Vec<Segment> },
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    words: Vec<Word>,
}

impl TranscriptFile {
    fn into_words(self) -> Vec<Word> {
        match self {
            Self::Flat(words) => words,
            Self::Segmented { segments } => segments
                .into_iter()
                .flat_map(|segment| segment.words)
                .collect(),
        }
    }
}

/// Check the ordering and timing contract of a word stream.
///
/// Every word must have finite, non-negative times with `end >= start`,
/// and start times must be non-decreasing across the stream.
pub fn validate_words(words: &[Word]) -> std::result::Result<(), TranscriptError> {
    let mut previous_start: Option<f64> = None;

    for (index, word) in words.iter().enumerate() {
        if !word.start.is_finite() || !word.end.is_finite() {
            return Err(TranscriptError::NonFiniteTimestamp {
                index,
                text: word.text.clone(),
            });
        }
        if word.start < 0.0 {
            return Err(TranscriptError::NegativeTimestamp {
                index,
                text: word.text.clone(),
                start: word.start,
            });
        }
        if word.end < word.start {
            return Err(TranscriptError::NegativeDuration {
                index,
                text: word.text.clone(),
                start: word.start,
                end: word.end,
            });
        }
        if let Some(prev) = previous_start {
            if word.start < prev {
                return Err(TranscriptError::OutOfOrder {
                    index,
                    text: word.text.clone(),
                    previous_start: prev,
                    start: word.start,
                });
            }
        }
        previous_start = Some(word.start);
    }

    Ok(())
}

/// Parse a transcript from JSON text and validate it
pub fn parse_words(content: &str) -> Result<Vec<Word>> {
    let file: TranscriptFile = serde_json::from_str(content)
        .context("Transcript must be a list of {text, start, end} or {segments: [{words: [...]}]}")?;
    let words = file.into_words();
    validate_words(&words)?;
    Ok(words)
}

/// Load a word-timestamp JSON file from disk
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<Word>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    let words = parse_words(&content)
        .with_context(|| format!("Invalid transcript: {}", path.display()))?;
    debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Total spoken span in milliseconds, from zero to the last word's end
pub fn total_duration_ms(words: &[Word]) -> f64 {
    words
        .iter()
        .map(|w| w.end)
        .fold(0.0_f64, f64::max)
        * 1000.0
}
