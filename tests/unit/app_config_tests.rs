/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use storyreel::app_config::{Config, LogLevel};
use storyreel::errors::ConfigError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.pacing.min_silence_ms, 500);
    assert_eq!(config.pacing.min_chunk_ms, 5000);
    assert_eq!(config.pacing.max_chunk_ms, 10000);

    let rules = &config.subtitle_style.line_rules;
    assert_eq!(rules.max_words_per_line, 7);
    assert_eq!(rules.max_line_duration_s, 12.0);
    assert_eq!(rules.gap_threshold_s, 0.4);
    assert_eq!(config.subtitle_style.heading_match_threshold, 0.7);
    assert_eq!(config.subtitle_style.time_offset_s, 0.0);

    assert_eq!(config.video_rendering.target_width, 1920);
    assert_eq!(config.video_rendering.target_height, 1080);
    assert_eq!(config.video_rendering.fps, 24);
    assert!(!config.video_rendering.enable_calm_zoom);

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.subtitle_style.heading_match_threshold = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { ref field, .. }) if field == "heading_match_threshold"
    ));

    let mut config = Config::default();
    config.video_rendering.fps = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.video_rendering.calm_zoom_max_scale = 0.9;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.subtitle_style.line_rules.max_line_duration_s = 0.0;
    assert!(config.validate().is_err());
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "pacing": { "min_silence_ms": 300 },
            "subtitle_style": {
                "line_rules": { "max_words_per_line": 5 },
                "heading": { "primary_colour": "&H0000FFFF" }
            },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.pacing.min_silence_ms, 300);
    assert_eq!(config.pacing.min_chunk_ms, 5000);
    assert_eq!(config.subtitle_style.line_rules.max_words_per_line, 5);
    assert_eq!(config.subtitle_style.line_rules.gap_threshold_s, 0.4);
    assert_eq!(
        config.subtitle_style.heading.primary_colour.as_deref(),
        Some("&H0000FFFF")
    );
    assert_eq!(config.subtitle_style.heading.font_size, None);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

/// Test that a malformed config file is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that subtitle options carry the video geometry
#[test]
fn test_subtitle_options_shouldUseVideoGeometry() {
    let mut config = Config::default();
    config.video_rendering.target_width = 720;
    config.video_rendering.target_height = 1280;
    config.subtitle_style.time_offset_s = 3.5;

    let options = config.subtitle_options();

    assert_eq!((options.video_width, options.video_height), (720, 1280));
    assert_eq!(options.time_offset_s, 3.5);
}
