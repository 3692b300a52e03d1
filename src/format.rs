//! Source format tags and the format normalizer.
//!
//! Keypoint sources disagree on joint count, ordering, and per-joint arity:
//! MediaPipe emits 33 landmarks with x, y, z; the mm-fit motion dataset
//! stores 18 joints with x, y only. Each source carries an explicit
//! [`SourceFormat`] tag — never inferred from file extensions — and
//! [`SourceFormat::to_canonical`] reconciles a raw frame into the canonical
//! 17-joint [`Pose`].

use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};
use crate::pose::{JointIndex, Pose};

/// One raw frame as provided by a source: per-joint coordinate groups.
pub type RawFrame = Vec<Vec<f32>>;

/// Known source keypoint layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Already in the canonical 17-joint, 3-coordinate layout.
    Canonical,
    /// MediaPipe Pose: 33 landmarks, x/y/z per landmark.
    MediaPipe,
    /// mm-fit 2D poses: 18 joints, x/y per joint (z defaults to 0).
    MmFit,
}

impl SourceFormat {
    /// Number of joints this format provides per frame.
    #[must_use]
    pub const fn joint_count(&self) -> usize {
        match self {
            Self::Canonical => JointIndex::COUNT,
            Self::MediaPipe => 33,
            Self::MmFit => 18,
        }
    }

    /// Coordinates per joint in flat-array storage for this format.
    #[must_use]
    pub const fn coord_arity(&self) -> usize {
        match self {
            Self::Canonical | Self::MediaPipe => 3,
            Self::MmFit => 2,
        }
    }

    /// String tag used in CLI arguments and source manifests.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::MediaPipe => "mediapipe",
            Self::MmFit => "mmfit",
        }
    }

    /// Convert one raw frame into a canonical pose.
    ///
    /// `joints` is the per-joint coordinate list as provided by the source.
    /// Each joint must carry either 2 (x, y) or 3 (x, y, z) numbers, and the
    /// arity must be consistent across the whole frame. When the source has
    /// more joints than the canonical skeleton the first 17 are taken in
    /// source order (a fixed truncation rule, not a best-effort remap); when
    /// it has fewer, the remaining canonical slots stay zero-filled.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Format`] when per-joint arity is mixed or
    /// outside 2..=3.
    pub fn to_canonical(&self, joints: &[Vec<f32>]) -> Result<Pose> {
        let arity = match joints.first() {
            Some(first) => first.len(),
            None => return Ok(Pose::default()),
        };
        if arity != 2 && arity != 3 {
            return Err(PipelineError::Format(format!(
                "unsupported per-joint arity {arity}, expected 2 or 3"
            )));
        }
        if let Some((idx, bad)) = joints.iter().enumerate().find(|(_, j)| j.len() != arity) {
            return Err(PipelineError::Format(format!(
                "inconsistent arity within frame: joint 0 has {arity} coords, joint {idx} has {}",
                bad.len()
            )));
        }

        let mut canonical = [[0.0f32; 3]; JointIndex::COUNT];
        for (slot, joint) in canonical.iter_mut().zip(joints.iter()) {
            slot[0] = joint[0];
            slot[1] = joint[1];
            slot[2] = if arity == 3 { joint[2] } else { 0.0 };
        }
        Ok(Pose::new(canonical))
    }

    /// Split a flat per-frame array into per-joint coordinate groups using
    /// this format's arity.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Format`] when the array length is not a
    /// multiple of the format's coordinate arity.
    pub fn chunk_flat(&self, flat: &[f32]) -> Result<Vec<Vec<f32>>> {
        let arity = self.coord_arity();
        if flat.len() % arity != 0 {
            return Err(PipelineError::Format(format!(
                "flat frame of {} values is not divisible by arity {arity} ({})",
                flat.len(),
                self.as_str()
            )));
        }
        Ok(flat.chunks_exact(arity).map(<[f32]>::to_vec).collect())
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "mediapipe" => Ok(Self::MediaPipe),
            "mmfit" | "mm-fit" => Ok(Self::MmFit),
            _ => Err(PipelineError::Format(format!(
                "unknown source format '{s}', expected one of: canonical, mediapipe, mmfit"
            ))),
        }
    }
}
