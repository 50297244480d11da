/*!
 * Tests for error types and conversions
 */

use storyreel::errors::{AppError, ConfigError, RenderError, TranscriptError};

#[test]
fn test_transcriptError_outOfOrder_shouldDisplayWordAndTimes() {
    let error = TranscriptError::OutOfOrder {
        index: 3,
        text: "late".to_string(),
        previous_start: 2.5,
        start: 1.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("Word 3"));
    assert!(display.contains("'late'"));
    assert!(display.contains("2.5"));
}

#[test]
fn test_configError_invalid_shouldDisplayFieldAndReason() {
    let error = ConfigError::invalid("video_rendering.fps", "must be at least 1");
    assert_eq!(
        error.to_string(),
        "Invalid value for 'video_rendering.fps': must be at least 1"
    );
}

#[test]
fn test_renderError_timeout_shouldDisplayStepAndSeconds() {
    let error = RenderError::Timeout {
        step: "subtitle burn-in".to_string(),
        secs: 600,
    };
    let display = error.to_string();
    assert!(display.contains("600 seconds"));
    assert!(display.contains("subtitle burn-in"));
}

#[test]
fn test_appError_fromTranscriptError_shouldWrapCorrectly() {
    let error: AppError = TranscriptError::NonFiniteTimestamp {
        index: 0,
        text: "x".to_string(),
    }
    .into();
    assert!(matches!(error, AppError::Transcript(_)));
    assert!(error.to_string().starts_with("Transcript error:"));
}

#[test]
fn test_appError_fromConfigAndRender_shouldWrapCorrectly() {
    let config: AppError = ConfigError::invalid("fps", "zero").into();
    assert!(matches!(config, AppError::Config(_)));

    let render: AppError = RenderError::NoImages.into();
    assert!(matches!(render, AppError::Render(_)));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldWrapCorrectly() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(ref msg) if msg.contains("gone")));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "something odd"));
}
