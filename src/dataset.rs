//! Labeled samples and final dataset assembly.

use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::labels::LabelEncoding;
use crate::pose::{Pose, FEATURES_PER_POSE};

/// One normalized pose attributed to an exercise.
///
/// Immutable once created; the augmentor produces derived copies rather
/// than mutating the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Geometrically normalized pose.
    pub pose: Pose,
    /// Exercise label.
    pub label: String,
    /// Provenance: true for verified correct-form recordings (e.g. the
    /// public mm-fit dataset), false for unverified extractions.
    pub verified: bool,
}

impl Sample {
    #[must_use]
    pub fn new(pose: Pose, label: impl Into<String>, verified: bool) -> Self {
        Self {
            pose,
            label: label.into(),
            verified,
        }
    }

    /// Derive a new sample with a different pose but identical label and
    /// provenance. The augmentor's only construction path, which is what
    /// makes augmentation label-preserving by construction.
    #[must_use]
    pub fn derive(&self, pose: Pose) -> Self {
        Self {
            pose,
            label: self.label.clone(),
            verified: self.verified,
        }
    }
}

/// The assembled training dataset: parallel feature and label arrays.
///
/// `features` has shape `(N, 51)`; `labels` has length `N` and
/// `features.row(i)` is labeled by `labels[i]`. Owned by the assembler until
/// handed to the training component.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f32>,
    pub labels: Array1<usize>,
}

/// On-disk form of [`Dataset`], plain JSON readable without this crate.
#[derive(Debug, Serialize, Deserialize)]
struct DatasetFile {
    features: Vec<Vec<f32>>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Merge samples into the final feature/label arrays.
    ///
    /// Labels are resolved through the frozen encoding. No deduplication is
    /// performed: augmented near-duplicates are intentional.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyDataset`] when no samples remain, and
    /// [`PipelineError::UnknownLabel`] when a sample's label was absent at
    /// encoding-build time (a phase-ordering bug, fatal).
    pub fn assemble(samples: &[Sample], encoding: &LabelEncoding) -> Result<Self> {
        if samples.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let mut features = Array2::zeros((samples.len(), FEATURES_PER_POSE));
        let mut labels = Array1::zeros(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let flat = sample.pose.flatten();
            features.row_mut(i).assign(&Array1::from_vec(flat));
            labels[i] = encoding.index_of(&sample.label)?;
        }

        Ok(Self { features, labels })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Write the dataset as JSON, readable by the training component
    /// without re-running the pipeline.
    ///
    /// # Errors
    ///
    /// Propagates I/O and serialization errors.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = DatasetFile {
            features: self.features.rows().into_iter().map(|r| r.to_vec()).collect(),
            labels: self.labels.to_vec(),
        };
        let json = serde_json::to_string(&file)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved dataset.
    ///
    /// # Errors
    ///
    /// Propagates I/O and deserialization errors; rows of the wrong width
    /// are a [`PipelineError::Format`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let file: DatasetFile = serde_json::from_str(&json)?;

        if file.features.len() != file.labels.len() {
            return Err(PipelineError::Format(format!(
                "dataset file has {} feature rows but {} labels",
                file.features.len(),
                file.labels.len()
            )));
        }
        let mut features = Array2::zeros((file.features.len(), FEATURES_PER_POSE));
        for (i, row) in file.features.iter().enumerate() {
            if row.len() != FEATURES_PER_POSE {
                return Err(PipelineError::Format(format!(
                    "dataset row {i} has width {}, expected {FEATURES_PER_POSE}",
                    row.len()
                )));
            }
            features.row_mut(i).assign(&Array1::from_vec(row.clone()));
        }

        Ok(Self {
            features,
            labels: Array1::from_vec(file.labels),
        })
    }
}
