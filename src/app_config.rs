use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;
use crate::pacing::PacingConfig;
use crate::subtitle::heading_aligner::DEFAULT_MATCH_THRESHOLD;
use crate::subtitle::{LineRules, StyleSpec, SubtitleOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Scene pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Subtitle line rules and styles
    #[serde(default)]
    pub subtitle_style: SubtitleStyleConfig,

    /// Output video settings
    #[serde(default)]
    pub video_rendering: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Subtitle settings as written in the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleStyleConfig {
    /// Style for regular caption lines
    #[serde(default)]
    pub default: StyleSpec,

    /// Style for heading cues
    #[serde(default)]
    pub heading: StyleSpec,

    #[serde(default)]
    pub line_rules: LineRules,

    /// Minimum share of heading words that must be found in the transcript
    #[serde(default = "default_heading_match_threshold")]
    pub heading_match_threshold: f64,

    /// Shift applied to every subtitle time (e.g. for an intro)
    #[serde(default)]
    pub time_offset_s: f64,
}

impl Default for SubtitleStyleConfig {
    fn default() -> Self {
        Self {
            default: StyleSpec::default(),
            heading: StyleSpec::default(),
            line_rules: LineRules::default(),
            heading_match_threshold: default_heading_match_threshold(),
            time_offset_s: 0.0,
        }
    }
}

/// Video assembly settings for the media encoder
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_target_width")]
    pub target_width: u32,

    #[serde(default = "default_target_height")]
    pub target_height: u32,

    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Crossfade length between consecutive images
    #[serde(default = "default_transition_duration_s")]
    pub transition_duration_s: f64,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Slow zoom in and out on each still image
    #[serde(default)]
    pub enable_calm_zoom: bool,

    #[serde(default = "default_calm_zoom_max_scale")]
    pub calm_zoom_max_scale: f64,

    #[serde(default = "default_calm_zoom_cycles_per_clip")]
    pub calm_zoom_cycles_per_clip: f64,

    /// Upper bound for a single ffmpeg invocation
    #[serde(default = "default_ffmpeg_timeout_secs")]
    pub ffmpeg_timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_width: default_target_width(),
            target_height: default_target_height(),
            fps: default_fps(),
            transition_duration_s: default_transition_duration_s(),
            video_codec: default_video_codec(),
            pixel_format: default_pixel_format(),
            audio_codec: default_audio_codec(),
            enable_calm_zoom: false,
            calm_zoom_max_scale: default_calm_zoom_max_scale(),
            calm_zoom_cycles_per_clip: default_calm_zoom_cycles_per_clip(),
            ffmpeg_timeout_secs: default_ffmpeg_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_heading_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_target_width() -> u32 {
    1920
}

fn default_target_height() -> u32 {
    1080
}

fn default_fps() -> u32 {
    24
}

fn default_transition_duration_s() -> f64 {
    1.5
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_pixel_format() -> String {
    "yuv420p".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_calm_zoom_max_scale() -> f64 {
    1.05
}

fn default_calm_zoom_cycles_per_clip() -> f64 {
    0.5
}

fn default_ffmpeg_timeout_secs() -> u64 {
    600 // 10 minutes, long narrations take a while to encode
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.subtitle_options().validate()?;

        let render = &self.video_rendering;
        if render.fps == 0 {
            return Err(ConfigError::invalid("video_rendering.fps", "must be at least 1"));
        }
        if !render.transition_duration_s.is_finite() || render.transition_duration_s < 0.0 {
            return Err(ConfigError::invalid(
                "video_rendering.transition_duration_s",
                format!("must be zero or more, got {}", render.transition_duration_s),
            ));
        }
        if !render.calm_zoom_max_scale.is_finite() || render.calm_zoom_max_scale < 1.0 {
            return Err(ConfigError::invalid(
                "video_rendering.calm_zoom_max_scale",
                format!("must be at least 1.0, got {}", render.calm_zoom_max_scale),
            ));
        }
        if render.ffmpeg_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "video_rendering.ffmpeg_timeout_secs",
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// Subtitle builder options derived from the subtitle and video sections
    pub fn subtitle_options(&self) -> SubtitleOptions {
        let style = &self.subtitle_style;
        SubtitleOptions {
            line_rules: style.line_rules.clone(),
            heading_match_threshold: style.heading_match_threshold,
            time_offset_s: style.time_offset_s,
            video_width: self.video_rendering.target_width,
            video_height: self.video_rendering.target_height,
            default_style: style.default.clone(),
            heading_style: style.heading.clone(),
        }
    }

    /// Load a configuration file, or write and return the defaults if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
