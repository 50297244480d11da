/*!
 * Tests for caption line building and ASS output
 */

use storyreel::errors::ConfigError;
use storyreel::subtitle::{format_ass_time, CueStyle, StyleSpec, SubtitleBuilder, SubtitleOptions};
use storyreel::transcript::Word;
use crate::common;

fn default_builder() -> SubtitleBuilder {
    SubtitleBuilder::new(SubtitleOptions::default()).unwrap()
}

const NO_HEADINGS: [&str; 0] = [];

/// Test that a heading becomes its own cue and the rest form a caption
#[test]
fn test_build_withMatchedHeading_shouldSeparateHeadingAndCaption() {
    let words = common::hello_world_words();

    let document = default_builder().build(&words, &["Hello world"]).unwrap();

    assert_eq!(document.cues.len(), 2);
    let heading = &document.cues[0];
    assert_eq!(heading.style, CueStyle::Heading);
    assert_eq!(heading.text, "Hello world");
    assert_eq!((heading.start_s, heading.end_s), (0.0, 1.0));

    let caption = &document.cues[1];
    assert_eq!(caption.style, CueStyle::Default);
    assert_eq!(caption.text, "this works");
    assert_eq!((caption.first_word, caption.last_word), (2, 3));
}

/// Test that lines break at the word limit
#[test]
fn test_build_withEightWords_shouldBreakAfterSeven() {
    let texts = ["one", "two", "three", "four", "five", "six", "seven", "eight"];
    let words = common::evenly_spaced_words(&texts, 0.0, 0.3, 0.1);

    let document = default_builder().build(&words, &NO_HEADINGS).unwrap();

    assert_eq!(document.cues.len(), 2);
    assert_eq!(document.cues[0].word_count(), 7);
    assert_eq!(document.cues[0].text, "one two three four five six seven");
    assert_eq!(document.cues[1].word_count(), 1);
    assert_eq!(document.cues[1].text, "eight");
}

/// Test that every word not claimed by a heading is shown exactly once
#[test]
fn test_build_withStory_shouldCoverEveryWordOnce() {
    let (words, script) = common::story_fixture();
    let headings = storyreel::script::extract_headings(&script);

    let document = default_builder().build(&words, &headings).unwrap();

    let mut shown = vec![0usize; words.len()];
    for cue in &document.cues {
        for index in cue.first_word..=cue.last_word {
            shown[index] += 1;
        }
    }
    assert!(shown.iter().all(|&count| count == 1), "coverage: {:?}", shown);
    assert_eq!(document.heading_cues().count(), 2);
    assert_eq!(document.caption_cues().count(), 3);
}

/// Test that cues come out sorted by start time
#[test]
fn test_build_withStory_shouldSortCuesByStart() {
    let (words, script) = common::story_fixture();
    let headings = storyreel::script::extract_headings(&script);

    let document = default_builder().build(&words, &headings).unwrap();

    let texts: Vec<&str> = document.cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Chapter One",
            "The fox ran into the woods",
            "at dawn.",
            "Chapter Two",
            "Nobody followed it.",
        ]
    );
    for pair in document.cues.windows(2) {
        assert!(pair[0].start_s <= pair[1].start_s);
    }
}

/// Test that building the same input twice yields identical documents
#[test]
fn test_build_calledTwice_shouldBeByteIdentical() {
    let (words, script) = common::story_fixture();
    let headings = storyreel::script::extract_headings(&script);
    let builder = default_builder();

    let first = builder.build(&words, &headings).unwrap();
    let second = builder.build(&words, &headings).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.heading_cues().count(), 2);
}

/// Test that an empty transcript produces a header-only document
#[test]
fn test_build_withNoWords_shouldWriteHeaderOnly() {
    let document = default_builder().build(&[], &["Anything"]).unwrap();

    assert!(document.cues.is_empty());
    let text = document.to_string();
    assert_eq!(text, document.header.to_string());
    assert!(text.ends_with("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
}

/// Test the dialogue lines of a rendered document
#[test]
fn test_build_shouldRenderDialogueLines() {
    let words = common::hello_world_words();

    let text = default_builder().build(&words, &["Hello world"]).unwrap().to_string();

    assert!(text.contains("Dialogue: 0,0:00:00.00,0:00:01.00,HeadingStyle,,0,0,0,,Hello world\n"));
    assert!(text.contains("Dialogue: 0,0:00:01.20,0:00:01.90,Default,,0,0,0,,this works\n"));
}

/// Test that configured styles and geometry reach the header
#[test]
fn test_build_withCustomStyle_shouldWriteItInHeader() {
    let options = SubtitleOptions {
        video_width: 1080,
        video_height: 1920,
        default_style: StyleSpec {
            font_name: Some("Verdana".to_string()),
            font_size: Some(48),
            ..StyleSpec::default()
        },
        ..SubtitleOptions::default()
    };
    let builder = SubtitleBuilder::new(options).unwrap();

    let text = builder.build(&common::hello_world_words(), &NO_HEADINGS).unwrap().to_string();

    assert!(text.contains("PlayResX: 1080\n"));
    assert!(text.contains("PlayResY: 1920\n"));
    assert!(text.contains("Style: Default,Verdana,48,&H00FFFFFF,"));
    assert!(text.contains("Style: HeadingStyle,Arial,86,"));
}

/// Test that invalid options are refused at construction
#[test]
fn test_new_withNegativeGap_shouldFail() {
    let mut options = SubtitleOptions::default();
    options.line_rules.gap_threshold_s = -0.1;

    match SubtitleBuilder::new(options) {
        Err(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "line_rules.gap_threshold_s")
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

/// Test that invalid words are refused
#[test]
fn test_build_withInvalidWords_shouldFail() {
    let words = vec![Word::new("bad", 2.0, 1.0)];
    assert!(default_builder().build(&words, &NO_HEADINGS).is_err());
}

/// Test the timestamp format used by dialogue lines
#[test]
fn test_formatAssTime_shouldTruncateToCentiseconds() {
    assert_eq!(format_ass_time(0.0), "0:00:00.00");
    assert_eq!(format_ass_time(1.999), "0:00:01.99");
    assert_eq!(format_ass_time(3661.239), "1:01:01.23");
    assert_eq!(format_ass_time(-2.0), "0:00:00.00");
}
