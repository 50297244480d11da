/*!
 * Error types for the storyreel application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised when a word stream violates the timestamp contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// A start or end time is NaN or infinite
    #[error("Word {index} ('{text}') has a non-finite timestamp")]
    NonFiniteTimestamp {
        /// Index of the word in the stream
        index: usize,
        /// Surface text of the word
        text: String,
    },

    /// A start time lies before zero
    #[error("Word {index} ('{text}') starts before zero: {start}s")]
    NegativeTimestamp {
        index: usize,
        text: String,
        start: f64,
    },

    /// The word ends before it starts
    #[error("Word {index} ('{text}') ends before it starts: start {start}s, end {end}s")]
    NegativeDuration {
        index: usize,
        text: String,
        start: f64,
        end: f64,
    },

    /// Start times are not non-decreasing
    #[error("Word {index} ('{text}') starts at {start}s, before the previous word's start {previous_start}s")]
    OutOfOrder {
        index: usize,
        text: String,
        previous_start: f64,
        start: f64,
    },
}

/// Errors raised by configuration validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value outside its accepted range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while driving the media encoder
#[derive(Error, Debug)]
pub enum RenderError {
    /// Nothing to render
    #[error("No images provided for assembly")]
    NoImages,

    /// An input file does not exist
    #[error("Input file not found: {0}")]
    MissingInput(String),

    /// ffmpeg could not be started
    #[error("Failed to execute ffmpeg for {step}: {message}")]
    Spawn {
        step: String,
        message: String,
    },

    /// ffmpeg ran past the configured timeout
    #[error("ffmpeg timed out after {secs} seconds during {step}")]
    Timeout {
        step: String,
        secs: u64,
    },

    /// ffmpeg exited with a failure status
    #[error("ffmpeg failed during {step}: {stderr}")]
    Failed {
        step: String,
        stderr: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid word stream
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the media encoder
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
