use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// @module: Advanced SubStation Alpha document model and serialization

/// Which style a cue is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueStyle {
    Default,
    Heading,
}

impl CueStyle {
    /// Style name as referenced by dialogue lines
    pub fn ass_name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Heading => "HeadingStyle",
        }
    }
}

/// Presentation attributes for one style.
///
/// Every field is optional; unset fields fall back to the per-style defaults
/// when the header is written. Values are passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,

    /// Text colour in `&HAABBGGRR` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_colour: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_colour: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_colour: Option<String>,

    /// Numpad-style alignment (2 = bottom centre, 5 = middle centre)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_l: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_r: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_v: Option<u32>,
}

struct StyleDefaults {
    font_name: &'static str,
    font_size: u32,
    primary_colour: &'static str,
    outline_colour: &'static str,
    back_colour: &'static str,
    alignment: u8,
    margins: (u32, u32, u32),
}

const CAPTION_DEFAULTS: StyleDefaults = StyleDefaults {
    font_name: "Arial",
    font_size: 72,
    primary_colour: "&H00FFFFFF",
    outline_colour: "&H00000000",
    back_colour: "&H99000000",
    alignment: 2,
    margins: (10, 10, 20),
};

const HEADING_DEFAULTS: StyleDefaults = StyleDefaults {
    font_name: "Arial",
    font_size: 86,
    primary_colour: "&H00FFFF00",
    outline_colour: "&H00000000",
    back_colour: "&H60000000",
    alignment: 5,
    margins: (30, 30, 50),
};

impl StyleSpec {
    /// Render the `Style:` line for the given cue style
    pub fn style_line(&self, style: CueStyle) -> String {
        let d = match style {
            CueStyle::Default => &CAPTION_DEFAULTS,
            CueStyle::Heading => &HEADING_DEFAULTS,
        };

        format!(
            "Style: {},{},{},{},&H000000FF,{},{},-1,0,0,0,100,100,0,0,1,2,1,{},{},{},{},1",
            style.ass_name(),
            self.font_name.as_deref().unwrap_or(d.font_name),
            self.font_size.unwrap_or(d.font_size),
            self.primary_colour.as_deref().unwrap_or(d.primary_colour),
            self.outline_colour.as_deref().unwrap_or(d.outline_colour),
            self.back_colour.as_deref().unwrap_or(d.back_colour),
            self.alignment.unwrap_or(d.alignment),
            self.margin_l.unwrap_or(d.margins.0),
            self.margin_r.unwrap_or(d.margins.1),
            self.margin_v.unwrap_or(d.margins.2),
        )
    }
}

/// Format seconds as `H:MM:SS.cc`.
///
/// The value is rounded to the nearest millisecond, then truncated to
/// centiseconds. Negative or non-finite input is treated as zero.
pub fn format_ass_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
    let mut ms = (seconds * 1000.0).round() as u64;

    let hours = ms / 3_600_000;
    ms %= 3_600_000;
    let minutes = ms / 60_000;
    ms %= 60_000;
    let secs = ms / 1_000;
    ms %= 1_000;
    let centis = ms / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// One timed dialogue line
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    /// Start in seconds, offset already applied
    pub start_s: f64,

    /// End in seconds, offset already applied
    pub end_s: f64,

    pub style: CueStyle,

    /// Display text; line breaks are already encoded as `\N`
    pub text: String,

    /// First transcript word shown by this cue
    pub first_word: usize,

    /// Last transcript word shown by this cue (inclusive)
    pub last_word: usize,
}

impl SubtitleCue {
    pub fn word_count(&self) -> usize {
        self.last_word - self.first_word + 1
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},,0,0,0,,{}",
            format_ass_time(self.start_s),
            format_ass_time(self.end_s),
            self.style.ass_name(),
            self.text
        )
    }
}

/// Script info and style table written ahead of the events
#[derive(Debug, Clone, PartialEq)]
pub struct AssHeader {
    pub video_width: u32,
    pub video_height: u32,
    pub default_style: StyleSpec,
    pub heading_style: StyleSpec,
}

impl fmt::Display for AssHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "Title: Auto-Generated Subtitles")?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "WrapStyle: 0")?;
        writeln!(f, "PlayResX: {}", self.video_width)?;
        writeln!(f, "PlayResY: {}", self.video_height)?;
        writeln!(f, "ScaledBorderAndShadow: yes")?;
        writeln!(f)?;
        writeln!(f, "[V4+ Styles]")?;
        writeln!(
            f,
            "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding"
        )?;
        writeln!(f, "{}", self.default_style.style_line(CueStyle::Default))?;
        writeln!(f, "{}", self.heading_style.style_line(CueStyle::Heading))?;
        writeln!(f)?;
        writeln!(f, "[Events]")?;
        writeln!(
            f,
            "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
        )
    }
}

/// Complete subtitle document: header plus time-sorted cues
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleDocument {
    pub header: AssHeader,
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleDocument {
    pub fn heading_cues(&self) -> impl Iterator<Item = &SubtitleCue> {
        self.cues.iter().filter(|c| c.style == CueStyle::Heading)
    }

    pub fn caption_cues(&self) -> impl Iterator<Item = &SubtitleCue> {
        self.cues.iter().filter(|c| c.style == CueStyle::Default)
    }

    /// Write the document as an `.ass` file
    pub fn write_to_ass<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        write!(file, "{}", self)
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for cue in &self.cues {
            writeln!(f, "{}", cue)?;
        }
        Ok(())
    }
}
