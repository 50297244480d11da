use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::pacing::{PacingSegmenter, Scene};
use crate::renderer::{ImageClip, Renderer};
use crate::script;
use crate::subtitle::{SubtitleBuilder, SubtitleDocument};
use crate::transcript::{self, Word};

// @module: Application controller for transcript analysis and rendering

/// Files written for one transcript
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub scenes_path: PathBuf,
    pub subtitles_path: PathBuf,
    pub scene_count: usize,
    pub cue_count: usize,
    pub heading_count: usize,
}

/// What happened to one transcript
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed(AnalysisOutput),
    /// Outputs already existed and overwriting was not requested
    Skipped,
}

/// Counts for a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    segmenter: PacingSegmenter,
    builder: SubtitleBuilder,
}

impl Controller {
    /// Create a controller; the configuration is validated here
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let segmenter = PacingSegmenter::new(&config.pacing);
        let builder = SubtitleBuilder::new(config.subtitle_options())?;

        Ok(Self {
            config,
            segmenter,
            builder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scenes for a word stream
    pub fn scenes(&self, words: &[Word]) -> Result<Vec<Scene>> {
        Ok(self.segmenter.segment(words)?)
    }

    /// Subtitle document for a word stream and its script headings
    pub fn subtitles(&self, words: &[Word], headings: &[String]) -> Result<SubtitleDocument> {
        Ok(self.builder.build(words, headings)?)
    }

    /// Headings found in an optional script file
    pub fn load_headings(script_path: Option<&Path>) -> Result<Vec<String>> {
        match script_path {
            Some(path) => {
                let content = FileManager::read_to_string(path)?;
                let headings = script::extract_headings(&content);
                debug!("Found {} headings in {}", headings.len(), path.display());
                Ok(headings)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Write `<stem>.scenes.json` and `<stem>.ass` for one transcript
    pub fn analyze_file(
        &self,
        transcript_path: &Path,
        script_path: Option<&Path>,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        if !FileManager::file_exists(transcript_path) {
            return Err(anyhow!("Transcript does not exist: {:?}", transcript_path));
        }

        let scenes_path = FileManager::generate_output_path(transcript_path, output_dir, "scenes.json");
        let subtitles_path = FileManager::generate_output_path(transcript_path, output_dir, "ass");

        if scenes_path.exists() && subtitles_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, outputs already exist (use -f to force overwrite)",
                transcript_path.display()
            );
            return Ok(FileOutcome::Skipped);
        }

        let words = transcript::load_words(transcript_path)?;
        let headings = Self::load_headings(script_path)?;

        let scenes = self
            .scenes(&words)
            .with_context(|| format!("Pacing failed for {}", transcript_path.display()))?;
        let document = self
            .subtitles(&words, &headings)
            .with_context(|| format!("Subtitle generation failed for {}", transcript_path.display()))?;

        FileManager::ensure_dir(output_dir)?;
        let scenes_json = serde_json::to_string_pretty(&scenes)
            .context("Failed to serialize scenes to JSON")?;
        FileManager::write_to_file(&scenes_path, &scenes_json)?;
        document.write_to_ass(&subtitles_path)?;

        let output = AnalysisOutput {
            scenes_path,
            subtitles_path,
            scene_count: scenes.len(),
            cue_count: document.cues.len(),
            heading_count: document.heading_cues().count(),
        };
        info!(
            "{}: {} words, {} scenes, {} cues ({} headings)",
            transcript_path.display(),
            words.len(),
            output.scene_count,
            output.cue_count,
            output.heading_count
        );

        Ok(FileOutcome::Processed(output))
    }

    /// Analyze every `*.words.json` below a directory, writing outputs beside each file
    pub fn analyze_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let transcripts = FileManager::find_transcripts(input_dir)?;
        if transcripts.is_empty() {
            return Err(anyhow!("No transcript files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(transcripts.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("=>-"));

        let mut summary = FolderSummary::default();

        for transcript_path in &transcripts {
            let file_name = transcript_path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = transcript_path.parent().unwrap_or(input_dir);
            let script_path = FileManager::sibling_script(transcript_path);

            match self.analyze_file(transcript_path, script_path.as_deref(), output_dir, force_overwrite) {
                Ok(FileOutcome::Processed(_)) => summary.processed += 1,
                Ok(FileOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {:.1}s",
            summary.processed,
            summary.skipped,
            summary.failed,
            start_time.elapsed().as_secs_f64()
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join("storyreel.log");
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &summary_message) {
            warn!("Failed to write folder log: {}", e);
        }

        Ok(summary)
    }

    /// Load the `[{path, duration_s}]` image sequence written by the image step
    pub fn load_image_sequence(path: &Path) -> Result<Vec<ImageClip>> {
        let content = FileManager::read_to_string(path)?;
        let mut clips: Vec<ImageClip> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid image sequence: {}", path.display()))?;

        // Relative image paths are resolved against the sequence file
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for clip in &mut clips {
            if clip.path.is_relative() {
                clip.path = base.join(&clip.path);
            }
        }

        Ok(clips)
    }

    /// Assemble the video and burn in subtitles.
    ///
    /// Input errors are returned; encoder failures are logged and reported as `false`.
    pub async fn render(
        &self,
        images_path: &Path,
        audio_path: &Path,
        subtitles_path: &Path,
        output_path: &Path,
    ) -> Result<bool> {
        let clips = Self::load_image_sequence(images_path)?;
        let renderer = Renderer::new(self.config.video_rendering.clone());

        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let intermediate = output_path.with_file_name(format!("{}.nosubs.mp4", stem));

        if let Err(e) = renderer
            .assemble_primary_video(&clips, audio_path, &intermediate)
            .await
        {
            error!("Primary video assembly failed: {}", e);
            return Ok(false);
        }

        let burned = renderer
            .burn_subtitles(&intermediate, subtitles_path, output_path)
            .await;

        if let Err(e) = std::fs::remove_file(&intermediate) {
            debug!("Could not remove {}: {}", intermediate.display(), e);
        }

        match burned {
            Ok(()) => {
                info!("Final video saved to {}", output_path.display());
                Ok(true)
            }
            Err(e) => {
                error!("Subtitle burn-in failed: {}", e);
                Ok(false)
            }
        }
    }
}
