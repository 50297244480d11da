// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use storyreel::app_config::{self, Config};
use storyreel::app_controller::{Controller, FileOutcome};
use storyreel::file_utils::FileManager;
use storyreel::pacing::display_durations;
use storyreel::transcript;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a word-timestamp transcript into paced scenes
    Scenes {
        /// Word-timestamp JSON file
        #[arg(value_name = "WORDS_JSON")]
        words: PathBuf,

        /// Write scenes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also log how long each scene stays on screen
        #[arg(long)]
        show_durations: bool,
    },

    /// Build an .ass subtitle file from a transcript and optional script headings
    Subtitles {
        /// Word-timestamp JSON file
        #[arg(value_name = "WORDS_JSON")]
        words: PathBuf,

        /// Script containing `:Heading::` markers
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Output .ass file (defaults to <stem>.ass next to the transcript)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write scenes and subtitles for a transcript or a folder of transcripts
    Analyze {
        /// Transcript file or directory of `*.words.json` files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Script for a single transcript (folders use `<stem>.script.txt`)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Output directory for a single transcript
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Assemble images and narration into a video with burned-in subtitles
    Render {
        /// JSON list of `{ "path", "duration_s" }` images
        #[arg(long)]
        images: PathBuf,

        /// Narration audio
        #[arg(long)]
        audio: PathBuf,

        /// Subtitle file to burn in
        #[arg(long)]
        subtitles: PathBuf,

        /// Final video path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completions for storyreel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// storyreel - narrated story video tooling
///
/// Turns word-level transcripts into paced scenes and styled subtitles,
/// and assembles still images plus narration into the final video.
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(version)]
#[command(about = "Scene pacing and subtitle generation for narrated videos")]
#[command(long_about = "storyreel splits word-timestamp transcripts into scenes, builds ASS subtitles with
heading cues from the narration script, and renders the final video with ffmpeg.

EXAMPLES:
    storyreel scenes story.words.json -o story.scenes.json
    storyreel subtitles story.words.json -s story.script.txt
    storyreel analyze ./stories/ -f
    storyreel render --images images.json --audio story.wav --subtitles story.ass -o story.mp4
    storyreel completions bash > storyreel.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The global max level is what actually gets adjusted after startup
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the level is adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "storyreel", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Scenes {
            words,
            output,
            show_durations,
        } => run_scenes(&controller, &words, output.as_deref(), show_durations),
        Commands::Subtitles {
            words,
            script,
            output,
        } => run_subtitles(&controller, &words, script.as_deref(), output),
        Commands::Analyze {
            input_path,
            script,
            output_dir,
            force_overwrite,
        } => run_analyze(
            &controller,
            &input_path,
            script.as_deref(),
            output_dir,
            force_overwrite,
        ),
        Commands::Render {
            images,
            audio,
            subtitles,
            output,
        } => {
            if controller.render(&images, &audio, &subtitles, &output).await? {
                Ok(())
            } else {
                Err(anyhow!("Rendering failed, see the log above"))
            }
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_scenes(
    controller: &Controller,
    words_path: &Path,
    output: Option<&Path>,
    show_durations: bool,
) -> Result<()> {
    let words = transcript::load_words(words_path)?;
    let scenes = controller.scenes(&words)?;

    if show_durations {
        let durations = display_durations(&scenes, transcript::total_duration_ms(&words));
        for (i, (scene, millis)) in scenes.iter().zip(durations).enumerate() {
            info!("Scene {}: {:.2}s on screen, {:?}", i + 1, millis / 1000.0, scene.raw_text);
        }
    }

    let json = serde_json::to_string_pretty(&scenes)?;
    match output {
        Some(path) => {
            FileManager::write_to_file(path, &json)?;
            info!("Wrote {} scenes to {}", scenes.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_subtitles(
    controller: &Controller,
    words_path: &Path,
    script_path: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<()> {
    let words = transcript::load_words(words_path)?;
    let headings = Controller::load_headings(script_path)?;
    let document = controller.subtitles(&words, &headings)?;

    let output = output.unwrap_or_else(|| {
        let dir = words_path.parent().unwrap_or_else(|| Path::new("."));
        FileManager::generate_output_path(words_path, dir, "ass")
    });
    document.write_to_ass(&output)?;

    let heading_count = document.heading_cues().count();
    if heading_count < headings.len() {
        warn!(
            "Only {} of {} headings were found in the narration",
            heading_count,
            headings.len()
        );
    }
    info!("Wrote {} cues to {}", document.cues.len(), output.display());

    Ok(())
}

fn run_analyze(
    controller: &Controller,
    input_path: &Path,
    script_path: Option<&Path>,
    output_dir: Option<PathBuf>,
    force_overwrite: bool,
) -> Result<()> {
    if input_path.is_dir() {
        let summary = controller.analyze_folder(input_path, force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} transcript(s) failed", summary.failed));
        }
        return Ok(());
    }

    if !input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let output_dir = output_dir.unwrap_or_else(|| {
        input_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let script_path = script_path
        .map(Path::to_path_buf)
        .or_else(|| FileManager::sibling_script(input_path));

    match controller.analyze_file(input_path, script_path.as_deref(), &output_dir, force_overwrite)? {
        FileOutcome::Processed(output) => {
            info!("Success: {:?}", output.subtitles_path);
        }
        FileOutcome::Skipped => {}
    }

    Ok(())
}
