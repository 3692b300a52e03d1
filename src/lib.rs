#![allow(clippy::multiple_crate_versions)]

//! # Pose Dataset Pipeline
//!
//! Dataset preparation library for pose-based exercise classification:
//! turns raw video-derived body-landmark sequences into a normalized,
//! augmented, consistently-labeled numeric dataset, and maps trained-model
//! output indices back to exercise names.
//!
//! ## Features
//!
//! - **Format normalization** - Reconciles heterogeneous keypoint layouts
//!   (MediaPipe 33-landmark, mm-fit 18-joint) into one canonical 17-joint
//!   skeleton
//! - **Temporal smoothing** - Sliding-window mean over consecutive frames
//!   to damp detector jitter
//! - **Geometric normalization** - Hip-rooted, unit-extent coordinates,
//!   invariant to absolute position and scale
//! - **Frozen label encoding** - Sorted, reproducible label↔index mapping,
//!   persisted for inference-time lookup
//! - **Seeded augmentation** - Noise, mirroring, scale jitter, and
//!   small-angle rotations, reproducible from an explicit seed
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use pose_dataset::{
//!     LabelSpec, PipelineConfig, SequenceSource, SourceFormat, pipeline,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One source: frames of per-joint [x, y, z] arrays, one label.
//!     let frames = vec![vec![vec![0.5, 0.5, 0.0]; 33]; 10];
//!     let source = SequenceSource::new(
//!         "squat_keypoints",
//!         frames,
//!         SourceFormat::MediaPipe,
//!         LabelSpec::Single("squat".to_string()),
//!     );
//!
//!     let output = pipeline::run(&PipelineConfig::new().with_seed(42), &[source])?;
//!     println!(
//!         "{} samples, {} labels",
//!         output.dataset.len(),
//!         output.encoding.num_classes()
//!     );
//!     output.encoding.save("exercise_labels.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Prepare a dataset from a directory of keypoint files
//! pose-dataset prepare --source training/keypoints --format mediapipe
//!
//! # mm-fit workout directories, custom seed, no augmentation
//! pose-dataset prepare --source data/mm-fit --format mmfit --seed 7 --no-augment
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pose`] | Canonical 17-joint [`Pose`], [`PoseSequence`], [`JointIndex`] |
//! | [`format`] | [`SourceFormat`] tags and the format normalizer |
//! | [`smoothing`] | Temporal sliding-window smoothing |
//! | [`normalize`] | Geometric (position/scale) normalization |
//! | [`labels`] | [`LabelTable`], frozen [`LabelEncoding`] |
//! | [`augment`] | Seeded [`Augmentor`] and [`AugmentConfig`] |
//! | [`dataset`] | [`Sample`], [`Dataset`] assembly and export |
//! | [`source`] | Source discovery and ingestion |
//! | [`pipeline`] | [`PipelineConfig`] and the two-phase run |
//! | [`error`] | Error types ([`PipelineError`], [`Result`]) |

// Modules
pub mod augment;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod format;
pub mod labels;
pub mod normalize;
pub mod pipeline;
pub mod pose;
pub mod smoothing;
pub mod source;

// Re-export main types for convenience
pub use augment::{AugmentConfig, Augmentor};
pub use dataset::{Dataset, Sample};
pub use error::{PipelineError, Result};
pub use format::SourceFormat;
pub use labels::{LabelEncoding, LabelTable};
pub use pipeline::{PipelineConfig, PipelineOutput, PipelineReport};
pub use pose::{JointIndex, Pose, PoseSequence, FEATURES_PER_POSE};
pub use source::{LabelSpec, SequenceSource, SourceLocation};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
