//! Error types for the dataset pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the dataset pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Malformed or inconsistent source keypoint data (mixed per-joint
    /// arity, flat arrays not divisible by the coordinate count, etc.).
    Format(String),
    /// A pose collapsed to zero extent during geometric normalization.
    /// Recoverable: the caller drops the sample instead of dividing by zero.
    DegeneratePose,
    /// A label was resolved after the encoding was frozen without being
    /// present at build time. Indicates a pipeline ordering bug; fatal.
    UnknownLabel(String),
    /// No samples survived filtering; there is nothing to train on.
    EmptyDataset,
    /// Invalid configuration (even smoothing window, empty source set, etc.).
    Config(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
    /// JSON (de)serialization error.
    Json(serde_json::Error),
    /// Label table CSV parsing error.
    Csv(csv::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(msg) => write!(f, "Format error: {msg}"),
            Self::DegeneratePose => write!(f, "Degenerate pose: zero extent after centering"),
            Self::UnknownLabel(label) => {
                write!(f, "Unknown label '{label}': not present when encoding was frozen")
            }
            Self::EmptyDataset => write!(f, "Empty dataset: no samples survived filtering"),
            Self::Config(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::Csv(err) => write!(f, "CSV error: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
