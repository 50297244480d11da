/*!
 * Tests for transcript to scene segmentation
 */

use storyreel::errors::TranscriptError;
use storyreel::pacing::{display_durations, PacingConfig, PacingSegmenter, Scene};
use storyreel::transcript::Word;
use crate::common;

fn segmenter(min_silence_ms: u64, min_chunk_ms: u64, max_chunk_ms: u64) -> PacingSegmenter {
    PacingSegmenter::new(&PacingConfig {
        min_silence_ms,
        min_chunk_ms,
        max_chunk_ms,
    })
}

/// Assert that scenes cover every word exactly once, in order
fn assert_covers_all_words(scenes: &[Scene], word_count: usize) {
    let mut expected = 0;
    for scene in scenes {
        assert_eq!(scene.first_word, expected, "scene starts where the previous one ended");
        assert!(scene.last_word >= scene.first_word);
        expected = scene.last_word + 1;
    }
    assert_eq!(expected, word_count, "every word belongs to a scene");
}

/// Ten words over four seconds with a 0.6 s pause after the fifth word
fn paused_narration() -> Vec<Word> {
    let mut words = common::evenly_spaced_words(&["one", "two", "three", "four", "five"], 0.0, 0.3, 0.05);
    words.extend(common::evenly_spaced_words(
        &["six", "seven", "eight", "nine", "ten"],
        2.3,
        0.3,
        0.05,
    ));
    words
}

/// Test that a pause longer than the silence threshold splits the narration
#[test]
fn test_segment_withSinglePause_shouldSplitAtPause() {
    let words = paused_narration();
    assert!((words[9].end - 4.0).abs() < 1e-9);

    let scenes = segmenter(500, 1000, 5000).segment(&words).unwrap();

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].raw_text, "one two three four five");
    assert_eq!(scenes[1].raw_text, "six seven eight nine ten");
    assert_eq!(scenes[0].word_indices(), 0..=4);
    assert_eq!(scenes[1].word_indices(), 5..=9);
}

/// Test that a short middle chunk merges into the chunk after it
#[test]
fn test_segment_withShortMiddleChunk_shouldMergeForward() {
    let words = common::words(&[
        ("First", 0.0, 0.7),
        ("part.", 0.75, 1.5),
        ("Hm.", 2.1, 2.3),
        ("Then", 2.9, 3.4),
        ("more.", 3.45, 4.0),
    ]);

    let scenes = segmenter(500, 1000, 5000).segment(&words).unwrap();

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].raw_text, "First part.");
    assert_eq!(scenes[1].raw_text, "Hm. Then more.");
    assert!((scenes[1].duration_ms - 1900.0).abs() < 1e-6);
}

/// Test that a 9 s chunk is split into pieces no longer than the maximum
#[test]
fn test_segment_withLongChunk_shouldSplitUnderMaximum() {
    let texts = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
    let words = common::evenly_spaced_words(&texts, 0.0, 1.0, 0.0);

    let scenes = segmenter(500, 1000, 4000).segment(&words).unwrap();

    assert_eq!(scenes.len(), 3);
    for scene in &scenes {
        assert!(scene.duration_ms <= 4000.0, "scene too long: {:?}", scene);
    }
    assert_eq!(scenes[0].raw_text, "a b c d");
    assert_eq!(scenes[1].raw_text, "e f g h");
    assert_eq!(scenes[2].raw_text, "i");
    assert_covers_all_words(&scenes, words.len());
}

/// Test that scenes partition the words and keep their order
#[test]
fn test_segment_withIrregularPauses_shouldPartitionWordsInOrder() {
    let words = common::words(&[
        ("a", 0.0, 0.4),
        ("b", 0.45, 0.9),
        ("c", 2.0, 2.2),
        ("d", 2.3, 6.0),
        ("e", 6.8, 7.0),
        ("f", 7.1, 9.5),
        ("g", 9.55, 12.0),
        ("h", 13.0, 13.2),
    ]);

    let scenes = segmenter(500, 1500, 3000).segment(&words).unwrap();

    assert_covers_all_words(&scenes, words.len());
    for pair in scenes.windows(2) {
        assert!(pair[0].start_ms <= pair[1].start_ms);
        assert!(pair[0].end_ms <= pair[1].start_ms);
    }
    let joined: Vec<&str> = scenes.iter().flat_map(|s| s.raw_text.split(' ')).collect();
    assert_eq!(joined, vec!["a", "b", "c", "d", "e", "f", "g", "h"]);
}

/// Test that segmenting the same input twice yields the same scenes
#[test]
fn test_segment_calledTwice_shouldBeDeterministic() {
    let words = paused_narration();
    let segmenter = PacingSegmenter::with_defaults();
    assert_eq!(segmenter.segment(&words).unwrap(), segmenter.segment(&words).unwrap());
}

/// Test empty and single-word inputs
#[test]
fn test_segment_withEdgeInputs_shouldHandleThem() {
    let segmenter = PacingSegmenter::with_defaults();
    assert!(segmenter.segment(&[]).unwrap().is_empty());

    let single = vec![Word::new("Alone", 1.0, 1.4)];
    let scenes = segmenter.segment(&single).unwrap();
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].raw_text, "Alone");
    assert!((scenes[0].duration_ms - 400.0).abs() < 1e-6);
}

/// Test that invalid timestamps are reported rather than segmented
#[test]
fn test_segment_withBackwardsWord_shouldFail() {
    let words = vec![Word::new("a", 1.0, 1.5), Word::new("b", 0.5, 0.8)];
    let result = PacingSegmenter::with_defaults().segment(&words);
    assert!(matches!(result, Err(TranscriptError::OutOfOrder { .. })));
}

/// Test that display durations fill the narration without gaps
#[test]
fn test_displayDurations_shouldSumToTotal() {
    let words = paused_narration();
    let scenes = segmenter(500, 1000, 5000).segment(&words).unwrap();

    let durations = display_durations(&scenes, 5000.0);

    assert_eq!(durations.len(), 2);
    assert!((durations[0] - 2300.0).abs() < 1e-6);
    assert!((durations.iter().sum::<f64>() - 5000.0).abs() < 1e-6);
}
