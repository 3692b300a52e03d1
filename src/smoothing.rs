//! Temporal smoothing of pose sequences.
//!
//! Per-frame landmark detection jitters; a sliding-window mean over
//! consecutive frames damps it. Edge frames use a truncated window rather
//! than wrapping or padding, so the first and last frames are biased toward
//! their inner neighbors. Smoothing is deterministic but not idempotent:
//! re-applying it keeps blurring the sequence.

use crate::error::{PipelineError, Result};
use crate::pose::{JointIndex, Pose, PoseSequence};

/// Default smoothing window.
pub const DEFAULT_WINDOW: usize = 3;

/// Smooth a pose sequence with a centered sliding-window mean.
///
/// Output frame `i` is the element-wise mean of input frames in
/// `[max(0, i - w/2), min(len, i + w/2 + 1))`. The output sequence has the
/// same length, id, and frame range as the input.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if `window` is zero or even; the
/// window must be odd so it centers on the current frame.
pub fn smooth_sequence(seq: &PoseSequence, window: usize) -> Result<PoseSequence> {
    if window == 0 || window % 2 == 0 {
        return Err(PipelineError::Config(format!(
            "smoothing window must be odd and non-zero, got {window}"
        )));
    }

    let half = window / 2;
    let len = seq.poses.len();
    let mut smoothed = Vec::with_capacity(len);

    for i in 0..len {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(len);
        smoothed.push(mean_pose(&seq.poses[lo..hi]));
    }

    let mut out = PoseSequence::new(seq.id.clone(), smoothed);
    out.frame_range = seq.frame_range;
    Ok(out)
}

/// Element-wise mean of a non-empty pose slice.
fn mean_pose(poses: &[Pose]) -> Pose {
    let mut acc = [[0.0f32; 3]; JointIndex::COUNT];
    for pose in poses {
        for (slot, joint) in acc.iter_mut().zip(pose.joints.iter()) {
            slot[0] += joint[0];
            slot[1] += joint[1];
            slot[2] += joint[2];
        }
    }
    let n = poses.len() as f32;
    for joint in &mut acc {
        joint[0] /= n;
        joint[1] /= n;
        joint[2] /= n;
    }
    Pose::new(acc)
}
