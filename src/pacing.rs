/*!
 * Pacing segmentation for image-per-scene videos.
 *
 * Words are grouped into scenes by cutting on silences, then short scenes are
 * merged forward and long scenes are re-split on their word boundaries, so
 * that each generated image stays on screen for a comfortable duration.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::errors::TranscriptError;
use crate::transcript::{validate_words, Word};

const DEFAULT_MIN_CHUNK_MS: u64 = 5000;

/// Configuration for pacing segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Gap between two words (end to start) that counts as a cut point
    #[serde(default = "default_min_silence_ms")]
    pub min_silence_ms: u64,

    /// Scenes shorter than this are merged into the following scene
    #[serde(default = "default_min_chunk_ms")]
    pub min_chunk_ms: u64,

    /// Scenes longer than this are split on word boundaries
    #[serde(default = "default_max_chunk_ms")]
    pub max_chunk_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_silence_ms: default_min_silence_ms(),
            min_chunk_ms: default_min_chunk_ms(),
            max_chunk_ms: default_max_chunk_ms(),
        }
    }
}

impl PacingConfig {
    /// Fill in unset duration bounds.
    ///
    /// A zero minimum becomes 5000 ms; a zero maximum, or one not above the
    /// minimum, becomes twice the minimum.
    pub fn resolved(&self) -> Self {
        let min_chunk_ms = if self.min_chunk_ms == 0 {
            DEFAULT_MIN_CHUNK_MS
        } else {
            self.min_chunk_ms
        };
        let max_chunk_ms = if self.max_chunk_ms <= min_chunk_ms {
            min_chunk_ms.saturating_mul(2)
        } else {
            self.max_chunk_ms
        };

        Self {
            min_silence_ms: self.min_silence_ms,
            min_chunk_ms,
            max_chunk_ms,
        }
    }
}

fn default_min_silence_ms() -> u64 {
    500
}

fn default_min_chunk_ms() -> u64 {
    DEFAULT_MIN_CHUNK_MS
}

fn default_max_chunk_ms() -> u64 {
    DEFAULT_MIN_CHUNK_MS * 2
}

/// A contiguous run of words shown with one generated image.
///
/// Only `raw_text` and `duration_ms` are serialized; the timing and word span
/// are kept for callers that lay out a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Space-joined word texts
    pub raw_text: String,

    /// `end_ms - start_ms`
    pub duration_ms: f64,

    #[serde(skip)]
    pub start_ms: f64,

    #[serde(skip)]
    pub end_ms: f64,

    /// Index of the first word in the scene
    #[serde(skip)]
    pub first_word: usize,

    /// Index of the last word in the scene (inclusive)
    #[serde(skip)]
    pub last_word: usize,
}

impl Scene {
    /// Indices of the words covered by this scene
    pub fn word_indices(&self) -> RangeInclusive<usize> {
        self.first_word..=self.last_word
    }
}

/// Seconds to whole milliseconds, so that e.g. 2.3 - 1.8 compares as exactly 500
fn to_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round()
}

// @struct: Working span during segmentation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Chunk {
    first: usize,
    last: usize,
    start_ms: f64,
    end_ms: f64,
}

impl Chunk {
    fn from_words(words: &[Word], first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            start_ms: to_ms(words[first].start),
            end_ms: to_ms(words[last].end),
        }
    }

    fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    fn absorb(&mut self, next: Chunk) {
        self.last = next.last;
        self.end_ms = next.end_ms;
    }

    fn into_scene(self, words: &[Word]) -> Scene {
        let raw_text = words[self.first..=self.last]
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Scene {
            raw_text,
            duration_ms: self.duration_ms(),
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            first_word: self.first,
            last_word: self.last,
        }
    }
}

/// Segments a word stream into scenes.
#[derive(Debug, Clone)]
pub struct PacingSegmenter {
    config: PacingConfig,
}

impl PacingSegmenter {
    /// Create a segmenter; unset bounds are defaulted here.
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            config: config.resolved(),
        }
    }

    /// Create a segmenter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(&PacingConfig::default())
    }

    /// The effective configuration after defaulting
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Split, merge and re-split the word stream into scenes.
    ///
    /// Every word ends up in exactly one scene; an empty stream yields no scenes.
    pub fn segment(&self, words: &[Word]) -> Result<Vec<Scene>, TranscriptError> {
        validate_words(words)?;
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let initial = self.split_on_silence(words);
        let initial_count = initial.len();
        let merged = self.merge_short(initial);
        let merged_count = merged.len();
        let chunks = self.split_long(words, merged);

        debug!(
            "Pacing: {} words -> {} silence chunks -> {} after merge -> {} scenes",
            words.len(),
            initial_count,
            merged_count,
            chunks.len()
        );

        Ok(chunks.into_iter().map(|c| c.into_scene(words)).collect())
    }

    /// Close a chunk after every word followed by a long enough silence.
    fn split_on_silence(&self, words: &[Word]) -> Vec<Chunk> {
        let min_silence_ms = self.config.min_silence_ms as f64;
        let mut chunks = Vec::new();
        let mut first = 0;

        for i in 0..words.len() {
            let is_last = i + 1 == words.len();
            let cut = is_last || to_ms(words[i + 1].start) - to_ms(words[i].end) >= min_silence_ms;

            if cut {
                chunks.push(Chunk::from_words(words, first, i));
                first = i + 1;
            }
        }

        chunks
    }

    /// Merge every chunk shorter than the minimum into its successors.
    fn merge_short(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let min_chunk_ms = self.config.min_chunk_ms as f64;
        let mut merged = Vec::with_capacity(chunks.len());
        let mut iter = chunks.into_iter();

        while let Some(mut current) = iter.next() {
            while current.duration_ms() < min_chunk_ms {
                match iter.next() {
                    Some(next) => current.absorb(next),
                    None => break,
                }
            }
            merged.push(current);
        }

        merged
    }

    /// Re-split chunks longer than the maximum on their word boundaries.
    ///
    /// A sub-chunk is closed before the word that would push it past the
    /// maximum; a single word longer than the maximum stays on its own.
    fn split_long(&self, words: &[Word], chunks: Vec<Chunk>) -> Vec<Chunk> {
        let max_chunk_ms = self.config.max_chunk_ms as f64;
        let mut result = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if chunk.duration_ms() <= max_chunk_ms {
                result.push(chunk);
                continue;
            }

            let mut sub_first = chunk.first;
            for i in chunk.first..=chunk.last {
                let running_ms = to_ms(words[i].end) - to_ms(words[sub_first].start);
                if i > sub_first && running_ms > max_chunk_ms {
                    result.push(Chunk::from_words(words, sub_first, i - 1));
                    sub_first = i;
                }
            }
            result.push(Chunk::from_words(words, sub_first, chunk.last));
        }

        result
    }
}

/// Display durations that make the image sequence cover the whole narration.
///
/// Each scene is shown from its own start (the first from zero) until the next
/// scene starts; the last one stays until `total_ms` or its own end.
pub fn display_durations(scenes: &[Scene], total_ms: f64) -> Vec<f64> {
    scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let from = if i == 0 { 0.0 } else { scene.start_ms };
            let until = match scenes.get(i + 1) {
                Some(next) => next.start_ms,
                None => total_ms.max(scene.end_ms),
            };
            (until - from).max(0.0)
        })
        .collect()
}
