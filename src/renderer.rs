use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::errors::RenderError;

// @module: Video assembly and subtitle burn-in through ffmpeg

/// One still image and how long it stays on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageClip {
    pub path: PathBuf,
    pub duration_s: f64,
}

/// Escape a path for use inside an ffmpeg filter argument
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace(':', "\\:")
}

/// Drives ffmpeg to build the final video.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Arguments that turn the image sequence plus narration into a video.
    ///
    /// Each image is looped for its duration, scaled and padded to the target
    /// geometry, optionally slow-zoomed, and crossfaded into the next one.
    pub fn assemble_args(
        &self,
        images: &[ImageClip],
        audio: &Path,
        output: &Path,
    ) -> Result<Vec<String>, RenderError> {
        if images.is_empty() {
            return Err(RenderError::NoImages);
        }

        let c = &self.config;
        let mut args: Vec<String> = vec!["-y".to_string()];
        let mut filters = Vec::new();
        let mut segments = Vec::with_capacity(images.len());

        for (i, image) in images.iter().enumerate() {
            args.extend([
                "-loop".to_string(),
                "1".to_string(),
                "-framerate".to_string(),
                c.fps.to_string(),
                "-t".to_string(),
                image.duration_s.to_string(),
                "-i".to_string(),
                image.path.to_string_lossy().to_string(),
            ]);

            let base_label = format!("[base_img_{}]", i);
            filters.push(format!(
                "[{i}:v]fps={fps},scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setpts=PTS-STARTPTS{label}",
                i = i,
                fps = c.fps,
                w = c.target_width,
                h = c.target_height,
                label = base_label
            ));

            let mut segment_label = base_label;
            let frames = (image.duration_s * c.fps as f64) as u64;
            if c.enable_calm_zoom && frames > 0 {
                let zoomed_label = format!("[zoomed_img_{}]", i);
                filters.push(format!(
                    "{input}zoompan=z='1+({scale}-1)*(0.5-0.5*cos({cycles}*2*PI*on/{frames}))':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d={frames}:s={w}x{h}:fps={fps}{label}",
                    input = segment_label,
                    scale = c.calm_zoom_max_scale,
                    cycles = c.calm_zoom_cycles_per_clip,
                    frames = frames,
                    w = c.target_width,
                    h = c.target_height,
                    fps = c.fps,
                    label = zoomed_label
                ));
                segment_label = zoomed_label;
            }

            segments.push(segment_label);
        }

        let mut current = segments[0].clone();
        let mut elapsed = images[0].duration_s;
        for (i, next) in segments.iter().enumerate().skip(1) {
            let faded = format!("[faded_{}]", i - 1);
            filters.push(format!(
                "{}{}xfade=transition=fade:duration={}:offset={}{}",
                current,
                next,
                c.transition_duration_s,
                elapsed - c.transition_duration_s,
                faded
            ));
            elapsed += images[i].duration_s - c.transition_duration_s;
            current = faded;
        }

        args.extend([
            "-i".to_string(),
            audio.to_string_lossy().to_string(),
            "-filter_complex".to_string(),
            filters.join(";"),
            "-map".to_string(),
            current,
            "-map".to_string(),
            format!("{}:a", images.len()),
            "-c:v".to_string(),
            c.video_codec.clone(),
            "-pix_fmt".to_string(),
            c.pixel_format.clone(),
            "-c:a".to_string(),
            c.audio_codec.clone(),
            "-shortest".to_string(),
            output.to_string_lossy().to_string(),
        ]);

        Ok(args)
    }

    /// Arguments that burn an `.ass` file into a video, copying the audio
    pub fn burn_args(&self, video: &Path, subtitles: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vf".to_string(),
            format!("ass='{}'", escape_filter_path(subtitles)),
            "-c:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Assemble images and narration into a video without subtitles
    pub async fn assemble_primary_video(
        &self,
        images: &[ImageClip],
        audio: &Path,
        output: &Path,
    ) -> Result<(), RenderError> {
        for image in images {
            Self::require_file(&image.path)?;
        }
        Self::require_file(audio)?;

        let args = self.assemble_args(images, audio, output)?;
        self.run_ffmpeg(&args, "primary video assembly").await
    }

    /// Burn subtitles into an assembled video
    pub async fn burn_subtitles(
        &self,
        video: &Path,
        subtitles: &Path,
        output: &Path,
    ) -> Result<(), RenderError> {
        Self::require_file(video)?;
        Self::require_file(subtitles)?;

        let args = self.burn_args(video, subtitles, output);
        self.run_ffmpeg(&args, "subtitle burn-in").await
    }

    fn require_file(path: &Path) -> Result<(), RenderError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(RenderError::MissingInput(path.display().to_string()))
        }
    }

    async fn run_ffmpeg(&self, args: &[String], step: &str) -> Result<(), RenderError> {
        info!("Running ffmpeg for {}", step);
        debug!("ffmpeg {}", args.join(" "));

        let output = run_with_timeout("ffmpeg", args, step, self.config.ffmpeg_timeout_secs).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("ffmpeg failed during {}: {}", step, filtered);
            return Err(RenderError::Failed {
                step: step.to_string(),
                stderr: filtered,
            });
        }

        info!("Completed {}", step);
        Ok(())
    }
}

/// Run a command to completion, killing it if it outlives `timeout_secs`
async fn run_with_timeout(
    program: &str,
    args: &[String],
    step: &str,
    timeout_secs: u64,
) -> Result<Output, RenderError> {
    // Dropping the pending wait on timeout kills the child
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RenderError::Spawn {
            step: step.to_string(),
            message: e.to_string(),
        })?;

    let timeout_duration = std::time::Duration::from_secs(timeout_secs);
    tokio::select! {
        result = child.wait_with_output() => {
            result.map_err(|e| RenderError::Spawn {
                step: step.to_string(),
                message: e.to_string(),
            })
        },
        _ = tokio::time::sleep(timeout_duration) => {
            Err(RenderError::Timeout { step: step.to_string(), secs: timeout_secs })
        }
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "encoder",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
