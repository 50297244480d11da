/*!
 * Subtitle construction from word timestamps.
 *
 * Headings are aligned first and reserve their words; the remaining words are
 * grouped greedily into caption lines bounded by word count, line duration and
 * the silence between words. Heading and caption cues are then interleaved by
 * start time.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, TranscriptError};
use crate::subtitle::ass::{AssHeader, CueStyle, StyleSpec, SubtitleCue, SubtitleDocument};
use crate::subtitle::heading_aligner::{HeadingAligner, DEFAULT_MATCH_THRESHOLD};
use crate::transcript::{validate_words, Word};

/// Thresholds that decide where a caption line ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRules {
    #[serde(default = "default_max_words_per_line")]
    pub max_words_per_line: usize,

    /// Longest span from a line's first word start to its last word end
    #[serde(default = "default_max_line_duration_s")]
    pub max_line_duration_s: f64,

    /// A silence longer than this between two words starts a new line
    #[serde(default = "default_gap_threshold_s")]
    pub gap_threshold_s: f64,
}

impl Default for LineRules {
    fn default() -> Self {
        Self {
            max_words_per_line: default_max_words_per_line(),
            max_line_duration_s: default_max_line_duration_s(),
            gap_threshold_s: default_gap_threshold_s(),
        }
    }
}

fn default_max_words_per_line() -> usize {
    7
}

fn default_max_line_duration_s() -> f64 {
    12.0
}

fn default_gap_threshold_s() -> f64 {
    0.4
}

/// Every option the subtitle builder recognizes
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleOptions {
    pub line_rules: LineRules,

    /// Minimum heading coverage a match must exceed
    pub heading_match_threshold: f64,

    /// Shift applied to every emitted time
    pub time_offset_s: f64,

    pub video_width: u32,
    pub video_height: u32,

    pub default_style: StyleSpec,
    pub heading_style: StyleSpec,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            line_rules: LineRules::default(),
            heading_match_threshold: DEFAULT_MATCH_THRESHOLD,
            time_offset_s: 0.0,
            video_width: 1920,
            video_height: 1080,
            default_style: StyleSpec::default(),
            heading_style: StyleSpec::default(),
        }
    }
}

impl SubtitleOptions {
    /// Check that every threshold is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.line_rules;
        if rules.max_words_per_line == 0 {
            return Err(ConfigError::invalid(
                "line_rules.max_words_per_line",
                "must be at least 1",
            ));
        }
        if !rules.max_line_duration_s.is_finite() || rules.max_line_duration_s <= 0.0 {
            return Err(ConfigError::invalid(
                "line_rules.max_line_duration_s",
                format!("must be a positive number, got {}", rules.max_line_duration_s),
            ));
        }
        if !rules.gap_threshold_s.is_finite() || rules.gap_threshold_s < 0.0 {
            return Err(ConfigError::invalid(
                "line_rules.gap_threshold_s",
                format!("must be zero or more, got {}", rules.gap_threshold_s),
            ));
        }
        if !(0.0..=1.0).contains(&self.heading_match_threshold) {
            return Err(ConfigError::invalid(
                "heading_match_threshold",
                format!("must lie in [0, 1], got {}", self.heading_match_threshold),
            ));
        }
        if !self.time_offset_s.is_finite() {
            return Err(ConfigError::invalid("time_offset_s", "must be finite"));
        }
        if self.video_width == 0 || self.video_height == 0 {
            return Err(ConfigError::invalid(
                "video geometry",
                format!("must be non-zero, got {}x{}", self.video_width, self.video_height),
            ));
        }
        Ok(())
    }
}

/// Builds subtitle documents from word timestamps.
#[derive(Debug, Clone)]
pub struct SubtitleBuilder {
    options: SubtitleOptions,
    aligner: HeadingAligner,
}

impl SubtitleBuilder {
    /// Create a builder; options are validated once here.
    pub fn new(options: SubtitleOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let aligner = HeadingAligner::new(options.heading_match_threshold);
        Ok(Self { options, aligner })
    }

    pub fn options(&self) -> &SubtitleOptions {
        &self.options
    }

    /// Build the document for a word stream and optional headings.
    ///
    /// An empty word stream yields a header-only document.
    pub fn build<S: AsRef<str>>(
        &self,
        words: &[Word],
        headings: &[S],
    ) -> Result<SubtitleDocument, TranscriptError> {
        validate_words(words)?;

        let alignment = self.aligner.align(headings, words);
        let offset = self.options.time_offset_s;
        let mut cues = Vec::with_capacity(alignment.matches.len() + words.len() / 2);

        for heading in &alignment.matches {
            let (Some(first_word), Some(last_word)) = (heading.first_word(), heading.last_word())
            else {
                continue;
            };
            cues.push(SubtitleCue {
                start_s: heading.start_s + offset,
                end_s: heading.end_s + offset,
                style: CueStyle::Heading,
                text: heading.heading_text.replace('\n', "\\N"),
                first_word,
                last_word,
            });
        }

        let rules = &self.options.line_rules;
        let mut line: Option<(usize, usize)> = None;

        for (i, word) in words.iter().enumerate() {
            if alignment.used_indices.contains(&i) {
                if let Some((first, last)) = line.take() {
                    cues.push(self.caption_cue(words, first, last));
                }
                continue;
            }

            if let Some((first, last)) = line {
                let word_count = last - first + 1;
                let gap = word.start - words[i - 1].end;
                let line_duration = word.end - words[first].start;

                if word_count >= rules.max_words_per_line
                    || line_duration > rules.max_line_duration_s
                    || gap > rules.gap_threshold_s
                {
                    cues.push(self.caption_cue(words, first, last));
                    line = None;
                }
            }

            line = match line {
                Some((first, _)) => Some((first, i)),
                None => Some((i, i)),
            };
        }

        if let Some((first, last)) = line {
            cues.push(self.caption_cue(words, first, last));
        }

        cues.sort_by(|a, b| a.start_s.total_cmp(&b.start_s));

        debug!(
            "Subtitles: {} heading cues, {} caption cues from {} words",
            alignment.matches.len(),
            cues.len() - alignment.matches.len(),
            words.len()
        );

        Ok(SubtitleDocument {
            header: AssHeader {
                video_width: self.options.video_width,
                video_height: self.options.video_height,
                default_style: self.options.default_style.clone(),
                heading_style: self.options.heading_style.clone(),
            },
            cues,
        })
    }

    fn caption_cue(&self, words: &[Word], first: usize, last: usize) -> SubtitleCue {
        let text = words[first..=last]
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        SubtitleCue {
            start_s: words[first].start + self.options.time_offset_s,
            end_s: words[last].end + self.options.time_offset_s,
            style: CueStyle::Default,
            text,
            first_word: first,
            last_word: last,
        }
    }
}
