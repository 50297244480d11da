use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix of word-timestamp files picked up in folder mode
pub const TRANSCRIPT_SUFFIX: &str = ".words.json";

/// Suffix of the script file that accompanies a transcript
pub const SCRIPT_SUFFIX: &str = ".script.txt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Base name of a transcript: `talk.words.json` -> `talk`, `talk.json` -> `talk`
    pub fn transcript_stem<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(stem) = file_name.strip_suffix(TRANSCRIPT_SUFFIX) {
            return stem.to_string();
        }
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(file_name)
    }

    // @generates: Output path next to the transcript stem
    // @params: transcript, output_dir, extension (e.g. "ass", "scenes.json")
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        transcript: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let mut output_filename = Self::transcript_stem(transcript);
        output_filename.push('.');
        output_filename.push_str(extension);
        output_dir.as_ref().join(output_filename)
    }

    /// Script file sitting next to a transcript, if there is one
    pub fn sibling_script<P: AsRef<Path>>(transcript: P) -> Option<PathBuf> {
        let transcript = transcript.as_ref();
        let dir = transcript.parent().unwrap_or_else(|| Path::new(""));
        let candidate = dir.join(format!("{}{}", Self::transcript_stem(transcript), SCRIPT_SUFFIX));
        Self::file_exists(&candidate).then_some(candidate)
    }

    /// Find word-timestamp files below a directory, sorted by path
    pub fn find_transcripts<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && path.to_string_lossy().ends_with(TRANSCRIPT_SUFFIX) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
