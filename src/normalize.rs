//! Geometric normalization of poses.
//!
//! A classifier should see the same squat whether it was performed near the
//! camera or far from it, left of frame or right. Normalization makes
//! coordinates invariant to absolute position and scale: every joint is
//! re-centered on the hip root (joint 0), then divided by the maximum
//! Euclidean distance from that root.
//!
//! Scope: [`normalize_pose`] scales by the pose's own extent, so each output
//! pose lands exactly in `[-1, 1]`. [`normalize_sequence`] shares one extent
//! across all frames of the sequence, preserving relative motion amplitude
//! between frames at the cost of individual frames not reaching the full
//! range.

use crate::error::{PipelineError, Result};
use crate::pose::{Pose, PoseSequence};

/// Re-center a pose on its root joint and rescale to unit maximum extent.
///
/// The root joint becomes `(0, 0, 0)` and every coordinate magnitude is at
/// most 1 by construction.
///
/// # Errors
///
/// Returns [`PipelineError::DegeneratePose`] when all joints coincide with
/// the root (`max_dist == 0`); the caller drops the sample rather than
/// dividing by zero.
pub fn normalize_pose(pose: &Pose) -> Result<Pose> {
    let centered = center_on_root(pose);
    let max_dist = max_extent(&centered);
    if max_dist == 0.0 {
        return Err(PipelineError::DegeneratePose);
    }
    Ok(scale(&centered, 1.0 / max_dist))
}

/// Normalize a full sequence with one shared scale.
///
/// Each frame is re-centered on its own root joint, but a single `max_dist`
/// computed across all joints of all frames divides every coordinate.
///
/// # Errors
///
/// Returns [`PipelineError::DegeneratePose`] when the shared extent is zero
/// (every frame collapsed onto its root).
pub fn normalize_sequence(seq: &PoseSequence) -> Result<PoseSequence> {
    let centered: Vec<Pose> = seq.poses.iter().map(center_on_root).collect();
    let max_dist = centered.iter().map(max_extent).fold(0.0f32, f32::max);
    if max_dist == 0.0 {
        return Err(PipelineError::DegeneratePose);
    }
    let inv = 1.0 / max_dist;
    let mut out = PoseSequence::new(seq.id.clone(), centered.iter().map(|p| scale(p, inv)).collect());
    out.frame_range = seq.frame_range;
    Ok(out)
}

/// Subtract the root joint's coordinates from every joint, root included.
fn center_on_root(pose: &Pose) -> Pose {
    let root = pose.joints[0];
    let mut joints = pose.joints;
    for joint in &mut joints {
        joint[0] -= root[0];
        joint[1] -= root[1];
        joint[2] -= root[2];
    }
    Pose::new(joints)
}

/// Maximum Euclidean distance from the origin across all joints.
fn max_extent(pose: &Pose) -> f32 {
    pose.joints
        .iter()
        .map(|j| (j[0] * j[0] + j[1] * j[1] + j[2] * j[2]).sqrt())
        .fold(0.0f32, f32::max)
}

fn scale(pose: &Pose, factor: f32) -> Pose {
    let mut joints = pose.joints;
    for joint in &mut joints {
        joint[0] *= factor;
        joint[1] *= factor;
        joint[2] *= factor;
    }
    Pose::new(joints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointIndex;

    fn sample_pose() -> Pose {
        let mut joints = [[0.0f32; 3]; JointIndex::COUNT];
        joints[0] = [5.0, 5.0, 1.0];
        joints[1] = [7.0, 5.0, 1.0];
        joints[2] = [5.0, 9.0, 1.0];
        joints[3] = [2.0, 1.0, 1.0];
        Pose::new(joints)
    }

    #[test]
    fn test_root_at_origin() {
        let out = normalize_pose(&sample_pose()).unwrap();
        assert_eq!(out.joints[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_coordinates_bounded() {
        let out = normalize_pose(&sample_pose()).unwrap();
        for joint in &out.joints {
            for &c in joint {
                assert!(c.abs() <= 1.0 + 1e-6, "coordinate {c} out of range");
            }
        }
    }

    #[test]
    fn test_unit_max_extent() {
        let out = normalize_pose(&sample_pose()).unwrap();
        let max = out
            .joints
            .iter()
            .map(|j| (j[0] * j[0] + j[1] * j[1] + j[2] * j[2]).sqrt())
            .fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_translation_invariance() {
        let base = sample_pose();
        let mut shifted = base;
        for joint in &mut shifted.joints {
            joint[0] += 100.0;
            joint[1] -= 40.0;
        }
        let a = normalize_pose(&base).unwrap();
        let b = normalize_pose(&shifted).unwrap();
        for (ja, jb) in a.joints.iter().zip(b.joints.iter()) {
            for (ca, cb) in ja.iter().zip(jb.iter()) {
                assert!((ca - cb).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_scale_invariance() {
        let base = sample_pose();
        let mut doubled = base;
        for joint in &mut doubled.joints {
            joint[0] *= 2.0;
            joint[1] *= 2.0;
            joint[2] *= 2.0;
        }
        let a = normalize_pose(&base).unwrap();
        let b = normalize_pose(&doubled).unwrap();
        for (ja, jb) in a.joints.iter().zip(b.joints.iter()) {
            for (ca, cb) in ja.iter().zip(jb.iter()) {
                assert!((ca - cb).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_degenerate_pose_rejected() {
        assert!(matches!(
            normalize_pose(&Pose::default()),
            Err(PipelineError::DegeneratePose)
        ));

        // All joints stacked on a non-zero root are just as degenerate.
        let stacked = Pose::new([[3.0, 4.0, 5.0]; JointIndex::COUNT]);
        assert!(matches!(
            normalize_pose(&stacked),
            Err(PipelineError::DegeneratePose)
        ));
    }

    #[test]
    fn test_sequence_shares_extent() {
        let mut small = [[0.0f32; 3]; JointIndex::COUNT];
        small[1] = [1.0, 0.0, 0.0];
        let mut large = [[0.0f32; 3]; JointIndex::COUNT];
        large[1] = [4.0, 0.0, 0.0];

        let seq = PoseSequence::new("s", vec![Pose::new(small), Pose::new(large)]);
        let out = normalize_sequence(&seq).unwrap();

        // Shared max_dist is 4, so the small frame's joint lands at 0.25.
        assert!((out.poses[0].joints[1][0] - 0.25).abs() < 1e-6);
        assert!((out.poses[1].joints[1][0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sequence_all_degenerate() {
        let seq = PoseSequence::new("s", vec![Pose::default(); 3]);
        assert!(matches!(
            normalize_sequence(&seq),
            Err(PipelineError::DegeneratePose)
        ));
    }
}
