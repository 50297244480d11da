/*!
 * Tests for heading markers in narration scripts
 */

use storyreel::script::{extract_headings, narration_text};
use crate::common;

/// Test that headings are read from a generated script
#[test]
fn test_extractHeadings_withStoryScript_shouldFindBoth() {
    let (_, script) = common::story_fixture();
    assert_eq!(extract_headings(&script), vec!["Chapter One", "Chapter Two"]);
}

/// Test that markers inside a line are found too
#[test]
fn test_extractHeadings_withInlineMarker_shouldFindIt() {
    let script = "Intro text. :Part Two: The Return:: and more.";
    assert_eq!(extract_headings(script), vec!["Part Two: The Return"]);
}

/// Test that empty markers are skipped
#[test]
fn test_extractHeadings_withEmptyMarker_shouldSkipIt() {
    assert!(extract_headings(":   ::").is_empty());
}

/// Test that the narration keeps heading words but drops the markers
#[test]
fn test_narrationText_withStoryScript_shouldDropMarkers() {
    let (_, script) = common::story_fixture();
    let narration = narration_text(&script);
    assert!(narration.starts_with("Chapter One\nThe fox"));
    assert!(!narration.contains("::"));
}
