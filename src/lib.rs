/*!
 * # storyreel
 *
 * Scene pacing and subtitle generation for narrated story videos.
 *
 * ## Features
 *
 * - Split a word-timestamp transcript into scenes bounded by silence and
 *   by minimum and maximum scene lengths
 * - Build caption lines from the same words, with script headings found by
 *   fuzzy matching and shown as their own styled cues
 * - Write Advanced SubStation Alpha (`.ass`) subtitle files
 * - Assemble still images and narration into a video with ffmpeg and burn
 *   the subtitles in
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Word timestamps, loading and validation
 * - `pacing`: Transcript to scene segmentation
 * - `subtitle`: Subtitle generation:
 *   - `subtitle::heading_aligner`: Fuzzy heading location in the word stream
 *   - `subtitle::builder`: Caption line breaking
 *   - `subtitle::ass`: ASS header, styles and dialogue lines
 * - `script`: Heading markers in narration scripts
 * - `renderer`: ffmpeg video assembly and subtitle burn-in
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod pacing;
pub mod renderer;
pub mod script;
pub mod subtitle;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ConfigError, RenderError, TranscriptError};
pub use pacing::{PacingConfig, PacingSegmenter, Scene};
pub use subtitle::{HeadingAligner, SubtitleBuilder, SubtitleDocument};
pub use transcript::Word;
