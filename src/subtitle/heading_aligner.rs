/*!
 * Fuzzy alignment of script headings against a transcribed word stream.
 *
 * Headings are normalized and tokenized, then aligned against the normalized
 * transcript with longest-matching-block sequence alignment. The block that
 * covers the largest share of the heading wins, provided it clears the
 * acceptance threshold and does not reuse words claimed by an earlier heading.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use crate::transcript::Word;

static PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Default minimum share of heading tokens a block must cover
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// Lowercase, drop punctuation and collapse whitespace
pub fn normalize_for_matching(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lower = text.to_lowercase();
    let stripped = PUNCTUATION_REGEX.replace_all(&lower, "");
    WHITESPACE_REGEX.replace_all(&stripped, " ").trim().to_string()
}

/// A run of equal elements: `a[a..a+size] == b[b..b+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Non-overlapping matching blocks between two sequences, ordered by position.
///
/// Recursively takes the longest common contiguous run (earliest in `a`, then
/// earliest in `b` on ties) and repeats on the parts to its left and right.
/// Adjacent blocks are collapsed; zero-size blocks are never returned.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }
        if alo < block.a && blo < block.b {
            queue.push((alo, block.a, blo, block.b));
        }
        if block.a + block.size < ahi && block.b + block.size < bhi {
            queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
        }
        blocks.push(block);
    }

    blocks.sort_by_key(|m| (m.a, m.b, m.size));

    let mut collapsed: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match collapsed.last_mut() {
            Some(prev) if prev.a + prev.size == block.a && prev.b + prev.size == block.b => {
                prev.size += block.size;
            }
            _ => collapsed.push(block),
        }
    }

    collapsed
}

fn find_longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock { a: alo, b: blo, size: 0 };
    // Length of the run ending at b[j] for the previous row of a
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(item) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let previous = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0)
                } else {
                    0
                };
                let run = previous + 1;
                next_j2len.insert(j, run);
                if run > best.size {
                    best = MatchingBlock {
                        a: i + 1 - run,
                        b: j + 1 - run,
                        size: run,
                    };
                }
            }
        }
        j2len = next_j2len;
    }

    best
}

/// One heading located in the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingMatch {
    /// Heading as written in the script
    pub heading_text: String,

    /// Start of the first matched word
    pub start_s: f64,

    /// End of the last matched word
    pub end_s: f64,

    /// Transcript words consumed by this heading
    pub word_indices: BTreeSet<usize>,

    /// Share of heading tokens covered by the matched block
    pub score: f64,
}

impl HeadingMatch {
    pub fn first_word(&self) -> Option<usize> {
        self.word_indices.iter().next().copied()
    }

    pub fn last_word(&self) -> Option<usize> {
        self.word_indices.iter().next_back().copied()
    }
}

/// Result of aligning all headings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingAlignment {
    /// Accepted matches, ordered by start time
    pub matches: Vec<HeadingMatch>,

    /// Union of all accepted word indices
    pub used_indices: BTreeSet<usize>,
}

/// Aligns heading strings to spans of transcript words.
#[derive(Debug, Clone)]
pub struct HeadingAligner {
    threshold: f64,
}

impl Default for HeadingAligner {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl HeadingAligner {
    /// Create an aligner with a custom acceptance threshold in [0, 1]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Align headings in document order; unmatched headings are dropped.
    pub fn align<S: AsRef<str>>(&self, headings: &[S], words: &[Word]) -> HeadingAlignment {
        let mut alignment = HeadingAlignment::default();
        if headings.is_empty() || words.is_empty() {
            return alignment;
        }

        let transcript_tokens: Vec<String> = words
            .iter()
            .map(|w| normalize_for_matching(&w.text))
            .collect();

        for heading in headings {
            let heading = heading.as_ref();
            let normalized = normalize_for_matching(heading);
            if normalized.is_empty() {
                continue;
            }
            let heading_tokens: Vec<String> =
                normalized.split(' ').map(str::to_string).collect();

            match self.best_block(&heading_tokens, &transcript_tokens, &alignment.used_indices) {
                Some((block, score)) => {
                    let word_indices: BTreeSet<usize> = (block.b..block.b + block.size).collect();
                    debug!(
                        "Aligned heading (ratio {:.2}) to words {}..={}: \"{}\"",
                        score,
                        block.b,
                        block.b + block.size - 1,
                        heading
                    );
                    alignment.used_indices.extend(word_indices.iter().copied());
                    alignment.matches.push(HeadingMatch {
                        heading_text: heading.to_string(),
                        start_s: words[block.b].start,
                        end_s: words[block.b + block.size - 1].end,
                        word_indices,
                        score,
                    });
                }
                None => debug!("No acceptable match for heading: \"{}\"", heading),
            }
        }

        alignment
            .matches
            .sort_by(|a, b| a.start_s.total_cmp(&b.start_s));
        debug!(
            "Heading alignment complete: {}/{} headings aligned",
            alignment.matches.len(),
            headings.len()
        );

        alignment
    }

    /// First block with the highest coverage above the threshold that avoids used words
    fn best_block(
        &self,
        heading_tokens: &[String],
        transcript_tokens: &[String],
        used: &BTreeSet<usize>,
    ) -> Option<(MatchingBlock, f64)> {
        let mut best: Option<(MatchingBlock, f64)> = None;
        let mut highest = self.threshold;

        for block in matching_blocks(heading_tokens, transcript_tokens) {
            if used.range(block.b..block.b + block.size).next().is_some() {
                continue;
            }
            let ratio = block.size as f64 / heading_tokens.len() as f64;
            if ratio > highest {
                highest = ratio;
                best = Some((block, ratio));
            }
        }

        best
    }
}
