//! Source discovery and ingestion.
//!
//! An ingestible unit is one recording: its raw frames, an explicit format
//! tag, and a label specification. Two on-disk layouts are supported:
//!
//! - **Keypoint files**: a JSON array of frames produced by the landmark
//!   extraction step, named `<exercise>_keypoints.json`; the whole file
//!   carries the filename-derived label. Frames may be flat number arrays
//!   or per-joint coordinate groups.
//! - **Workout directories** (the mm-fit layout): `<name>_labels.csv` with
//!   frame-range rows next to `<name>_pose.json`. These recordings are
//!   marked verified, since the public dataset contains correct-form data.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::format::{RawFrame, SourceFormat};
use crate::labels::{label_from_filename, LabelTable};

/// How a source's frames map to labels.
#[derive(Debug, Clone)]
pub enum LabelSpec {
    /// Every frame carries the same label.
    Single(String),
    /// Frames are labeled by range; frames outside any range are excluded.
    Ranges(LabelTable),
}

/// One ingestible recording.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    /// Identifier for reporting (file stem or workout name).
    pub id: String,
    /// Raw per-frame joint arrays, not yet canonical.
    pub frames: Vec<RawFrame>,
    /// Explicit format tag; never inferred from file contents.
    pub format: SourceFormat,
    /// Label specification.
    pub labels: LabelSpec,
    /// Provenance flag carried onto every sample from this source.
    pub verified: bool,
}

impl SequenceSource {
    /// Build a source from in-memory frames.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        frames: Vec<RawFrame>,
        format: SourceFormat,
        labels: LabelSpec,
    ) -> Self {
        Self {
            id: id.into(),
            frames,
            format,
            labels,
            verified: false,
        }
    }

    /// Mark the source's samples as verified correct form.
    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }
}

/// A discovered on-disk source, not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A single keypoint JSON file; label derived from the filename.
    KeypointFile(PathBuf),
    /// A workout directory with a label table and a pose file.
    WorkoutDir(PathBuf),
}

impl SourceLocation {
    /// Identifier used in reports and logs.
    #[must_use]
    pub fn id(&self) -> String {
        let path = match self {
            Self::KeypointFile(p) | Self::WorkoutDir(p) => p,
        };
        path.file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().to_string())
    }

    /// Load the source's frames and label specification.
    ///
    /// # Errors
    ///
    /// Propagates I/O, JSON, and CSV errors; the pipeline treats them as
    /// per-source failures and skips the source.
    pub fn load(&self, format: SourceFormat) -> Result<SequenceSource> {
        match self {
            Self::KeypointFile(path) => load_keypoint_file(path, format),
            Self::WorkoutDir(path) => load_workout_dir(path, format),
        }
    }
}

/// Discover sources under a path.
///
/// A file resolves to a single keypoint source. A directory that contains
/// its own `<name>_labels.csv` is one workout source; any other directory
/// is scanned non-recursively for `*.json` keypoint files and workout
/// subdirectories. Results are sorted by path for deterministic runs.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] when the path does not exist or yields
/// no sources, and propagates directory-read errors.
pub fn discover(path: &Path) -> Result<Vec<SourceLocation>> {
    if path.is_file() {
        return Ok(vec![SourceLocation::KeypointFile(path.to_path_buf())]);
    }
    if !path.is_dir() {
        return Err(PipelineError::Config(format!(
            "source path does not exist: {}",
            path.display()
        )));
    }
    if workout_labels_file(path).is_some() {
        return Ok(vec![SourceLocation::WorkoutDir(path.to_path_buf())]);
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            if workout_labels_file(&entry_path).is_some() {
                found.push(SourceLocation::WorkoutDir(entry_path));
            }
        } else if entry_path.extension().is_some_and(|e| e == "json") {
            found.push(SourceLocation::KeypointFile(entry_path));
        }
    }
    found.sort_by(|a, b| {
        let (SourceLocation::KeypointFile(pa) | SourceLocation::WorkoutDir(pa)) = a;
        let (SourceLocation::KeypointFile(pb) | SourceLocation::WorkoutDir(pb)) = b;
        pa.cmp(pb)
    });

    if found.is_empty() {
        return Err(PipelineError::Config(format!(
            "no keypoint sources found under {}",
            path.display()
        )));
    }
    Ok(found)
}

/// The `<name>_labels.csv` path for a workout directory, if present.
fn workout_labels_file(dir: &Path) -> Option<PathBuf> {
    let name = dir.file_name()?.to_str()?;
    let labels = dir.join(format!("{name}_labels.csv"));
    labels.is_file().then_some(labels)
}

/// Frames as stored in keypoint JSON files: either flat per-frame arrays
/// or per-joint coordinate groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameFile {
    Flat(Vec<Vec<f32>>),
    Jointed(Vec<Vec<Vec<f32>>>),
}

fn read_frames(path: &Path, format: SourceFormat) -> Result<Vec<RawFrame>> {
    let json = fs::read_to_string(path)?;
    let file: FrameFile = serde_json::from_str(&json)?;
    match file {
        FrameFile::Jointed(frames) => Ok(frames),
        FrameFile::Flat(frames) => frames
            .iter()
            .map(|flat| format.chunk_flat(flat))
            .collect::<Result<Vec<_>>>(),
    }
}

fn load_keypoint_file(path: &Path, format: SourceFormat) -> Result<SequenceSource> {
    let label = label_from_filename(path).ok_or_else(|| {
        PipelineError::Format(format!(
            "cannot derive a label from file name: {}",
            path.display()
        ))
    })?;
    let frames = read_frames(path, format)?;
    let id = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().to_string());
    Ok(SequenceSource::new(id, frames, format, LabelSpec::Single(label)))
}

fn load_workout_dir(dir: &Path, format: SourceFormat) -> Result<SequenceSource> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PipelineError::Config(format!("bad workout directory name: {}", dir.display()))
        })?
        .to_string();

    let labels_path = workout_labels_file(dir).ok_or_else(|| {
        PipelineError::Config(format!(
            "missing {name}_labels.csv in {}",
            dir.display()
        ))
    })?;
    let table = LabelTable::from_csv_file(labels_path)?;

    let pose_path = dir.join(format!("{name}_pose.json"));
    let frames = read_frames(&pose_path, format)?;

    Ok(
        SequenceSource::new(name, frames, format, LabelSpec::Ranges(table))
            .with_verified(true),
    )
}
