//! The two-phase dataset pipeline.
//!
//! Phase 1 walks every source independently: raw frames become canonical
//! poses, the sequence is smoothed, frames are labeled (unlabeled frames
//! excluded), and each pose is geometrically normalized (degenerate poses
//! dropped). A malformed source is counted and skipped; it never aborts the
//! run. After the last source, the label encoding is frozen from the union
//! of labels on surviving samples.
//!
//! Phase 2 augments every sample and assembles the final dataset through
//! the frozen encoding. Only [`PipelineError::UnknownLabel`] (a phase
//! ordering bug) and [`PipelineError::EmptyDataset`] abort the whole run.

use crate::augment::{AugmentConfig, Augmentor};
use crate::dataset::{Dataset, Sample};
use crate::error::{PipelineError, Result};
use crate::labels::LabelEncoding;
use crate::normalize::normalize_pose;
use crate::pose::PoseSequence;
use crate::smoothing::{smooth_sequence, DEFAULT_WINDOW};
use crate::source::{LabelSpec, SequenceSource};

/// Default augmentation seed.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for a pipeline run.
///
/// Builder-style setters, defaults matching the training recipe: window 3,
/// smoothing and augmentation enabled, seed 42.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Seed for the augmentation RNG.
    pub seed: u64,
    /// Temporal smoothing window (must be odd).
    pub window: usize,
    /// Whether temporal smoothing runs at all.
    pub smoothing: bool,
    /// Whether phase 2 augments samples.
    pub augmentation: bool,
    /// Augmentation parameters.
    pub augment: AugmentConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            window: DEFAULT_WINDOW,
            smoothing: true,
            augmentation: true,
            augment: AugmentConfig::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the augmentation seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the smoothing window (odd).
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Enable or disable temporal smoothing.
    #[must_use]
    pub const fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing = enabled;
        self
    }

    /// Enable or disable augmentation.
    #[must_use]
    pub const fn with_augmentation(mut self, enabled: bool) -> Self {
        self.augmentation = enabled;
        self
    }

    /// Replace the augmentation parameters.
    #[must_use]
    pub fn with_augment_config(mut self, config: AugmentConfig) -> Self {
        self.augment = config;
        self
    }
}

/// Aggregate counts for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Sources seen.
    pub sources_total: usize,
    /// Sources skipped because loading or conversion failed.
    pub sources_failed: usize,
    /// Frames seen across all processed sources.
    pub frames_total: usize,
    /// Frames excluded because no label range covered them.
    pub frames_unlabeled: usize,
    /// Poses dropped as degenerate during normalization.
    pub degenerate_dropped: usize,
    /// Samples surviving phase 1.
    pub samples_raw: usize,
    /// Samples after augmentation.
    pub samples_final: usize,
    /// Distinct labels in the frozen encoding.
    pub num_labels: usize,
    /// Per-source failure descriptions, for logging.
    pub failures: Vec<(String, String)>,
}

/// Everything a pipeline run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Assembled feature/label arrays.
    pub dataset: Dataset,
    /// Frozen label encoding; persist this next to the trained artifact.
    pub encoding: LabelEncoding,
    /// Run statistics.
    pub report: PipelineReport,
}

/// Run the full pipeline over a set of sources.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] for an invalid smoothing window,
/// [`PipelineError::EmptyDataset`] when no samples survive, and
/// [`PipelineError::UnknownLabel`] if assembly meets a label that escaped
/// phase 1 (a phase-ordering bug, fatal). Per-source failures are recorded in
/// the report, never propagated.
pub fn run(config: &PipelineConfig, sources: &[SequenceSource]) -> Result<PipelineOutput> {
    if config.smoothing && (config.window == 0 || config.window % 2 == 0) {
        return Err(PipelineError::Config(format!(
            "smoothing window must be odd and non-zero, got {}",
            config.window
        )));
    }

    let mut report = PipelineReport {
        sources_total: sources.len(),
        ..PipelineReport::default()
    };

    // Phase 1: per-source conversion, smoothing, labeling, normalization.
    let mut samples = Vec::new();
    for source in sources {
        match process_source(config, source, &mut report) {
            Ok(mut source_samples) => samples.append(&mut source_samples),
            Err(err) => {
                report.sources_failed += 1;
                report.failures.push((source.id.clone(), err.to_string()));
            }
        }
    }
    report.samples_raw = samples.len();

    // Barrier: freeze the encoding from the union of surviving labels.
    let encoding = LabelEncoding::from_labels(samples.iter().map(|s| s.label.clone()));
    report.num_labels = encoding.num_classes();

    // Phase 2: augmentation and assembly.
    let samples = if config.augmentation {
        let mut augmentor = Augmentor::new(config.augment.clone(), config.seed);
        augmentor.augment_all(&samples)
    } else {
        samples
    };
    report.samples_final = samples.len();

    let dataset = Dataset::assemble(&samples, &encoding)?;
    Ok(PipelineOutput {
        dataset,
        encoding,
        report,
    })
}

/// Phase 1 for one source. Any error here fails only this source.
fn process_source(
    config: &PipelineConfig,
    source: &SequenceSource,
    report: &mut PipelineReport,
) -> Result<Vec<Sample>> {
    let poses = source
        .frames
        .iter()
        .map(|frame| source.format.to_canonical(frame))
        .collect::<Result<Vec<_>>>()?;

    let sequence = PoseSequence::new(source.id.clone(), poses);
    let sequence = if config.smoothing {
        smooth_sequence(&sequence, config.window)?
    } else {
        sequence
    };

    report.frames_total += sequence.len();

    let mut samples = Vec::with_capacity(sequence.len());
    for (frame_idx, pose) in sequence.poses.iter().enumerate() {
        let label = match &source.labels {
            LabelSpec::Single(label) => Some(label.as_str()),
            LabelSpec::Ranges(table) => table.label_for_frame(frame_idx),
        };
        let Some(label) = label else {
            report.frames_unlabeled += 1;
            continue;
        };

        match normalize_pose(pose) {
            Ok(normalized) => samples.push(Sample::new(normalized, label, source.verified)),
            Err(PipelineError::DegeneratePose) => report.degenerate_dropped += 1,
            Err(other) => return Err(other),
        }
    }
    Ok(samples)
}
