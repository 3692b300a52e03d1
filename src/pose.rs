//! Canonical pose representation.
//!
//! Every source format is reconciled into a fixed 17-joint skeleton in the
//! H3.6M ordering, with the hip root at index 0. The root joint is the
//! reference point for geometric normalization.

use std::fmt;

/// Canonical 17-joint skeleton indices (H3.6M ordering, hip-rooted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointIndex {
    Hip = 0,
    RightHip = 1,
    RightKnee = 2,
    RightAnkle = 3,
    LeftHip = 4,
    LeftKnee = 5,
    LeftAnkle = 6,
    Spine = 7,
    Thorax = 8,
    Neck = 9,
    Head = 10,
    LeftShoulder = 11,
    LeftElbow = 12,
    LeftWrist = 13,
    RightShoulder = 14,
    RightElbow = 15,
    RightWrist = 16,
}

impl JointIndex {
    /// Number of joints in the canonical skeleton.
    pub const COUNT: usize = 17;

    /// Look up a joint by its canonical index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Hip),
            1 => Some(Self::RightHip),
            2 => Some(Self::RightKnee),
            3 => Some(Self::RightAnkle),
            4 => Some(Self::LeftHip),
            5 => Some(Self::LeftKnee),
            6 => Some(Self::LeftAnkle),
            7 => Some(Self::Spine),
            8 => Some(Self::Thorax),
            9 => Some(Self::Neck),
            10 => Some(Self::Head),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::LeftElbow),
            13 => Some(Self::LeftWrist),
            14 => Some(Self::RightShoulder),
            15 => Some(Self::RightElbow),
            16 => Some(Self::RightWrist),
            _ => None,
        }
    }
}

/// Number of coordinates per joint: x, y, and z (or detector confidence).
pub const COORDS_PER_JOINT: usize = 3;

/// Flattened feature-vector width per pose (`17 * 3`).
pub const FEATURES_PER_POSE: usize = JointIndex::COUNT * COORDS_PER_JOINT;

/// One body pose: exactly 17 joints, each `[x, y, z_or_confidence]`.
///
/// The joint count is fixed by construction so flattened feature vectors
/// always have the same width. Missing joints are zero-filled, never omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub joints: [[f32; 3]; JointIndex::COUNT],
}

impl Pose {
    #[must_use]
    pub fn new(joints: [[f32; 3]; JointIndex::COUNT]) -> Self {
        Self { joints }
    }

    /// Get a joint's coordinates by canonical index.
    #[must_use]
    pub fn get(&self, index: JointIndex) -> [f32; 3] {
        self.joints[index as usize]
    }

    /// Flatten to the 51-element feature vector consumed by the classifier.
    #[must_use]
    pub fn flatten(&self) -> Vec<f32> {
        self.joints.iter().flatten().copied().collect()
    }

    /// Rebuild a pose from a flattened 51-element feature vector.
    ///
    /// Returns `None` if the slice has the wrong length.
    #[must_use]
    pub fn from_flat(flat: &[f32]) -> Option<Self> {
        if flat.len() != FEATURES_PER_POSE {
            return None;
        }
        let mut joints = [[0.0f32; 3]; JointIndex::COUNT];
        for (j, chunk) in flat.chunks_exact(COORDS_PER_JOINT).enumerate() {
            joints[j] = [chunk[0], chunk[1], chunk[2]];
        }
        Some(Self { joints })
    }

    /// Whether every coordinate of every joint is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.joints.iter().flatten().all(|&c| c == 0.0)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            joints: [[0.0; 3]; JointIndex::COUNT],
        }
    }
}

/// An ordered sequence of poses, one per video frame.
#[derive(Debug, Clone)]
pub struct PoseSequence {
    /// Source identifier (typically the originating file or workout name).
    pub id: String,
    /// Per-frame poses, in frame order.
    pub poses: Vec<Pose>,
    /// Frame-range bounds when cut from a longer recording.
    pub frame_range: Option<(usize, usize)>,
}

impl PoseSequence {
    #[must_use]
    pub fn new(id: impl Into<String>, poses: Vec<Pose>) -> Self {
        Self {
            id: id.into(),
            poses,
            frame_range: None,
        }
    }

    /// Attach the frame range this sequence was cut from.
    #[must_use]
    pub fn with_frame_range(mut self, start: usize, end: usize) -> Self {
        self.frame_range = Some((start, end));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl fmt::Display for PoseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} frames)", self.id, self.poses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_index_count() {
        assert_eq!(JointIndex::COUNT, 17);
        assert_eq!(FEATURES_PER_POSE, 51);
    }

    #[test]
    fn test_joint_index_from_index() {
        assert_eq!(JointIndex::from_index(0), Some(JointIndex::Hip));
        assert_eq!(JointIndex::from_index(16), Some(JointIndex::RightWrist));
        assert_eq!(JointIndex::from_index(17), None);
    }

    #[test]
    fn test_pose_flatten_roundtrip() {
        let mut joints = [[0.0; 3]; JointIndex::COUNT];
        joints[JointIndex::Head as usize] = [0.1, 0.2, 0.3];
        let pose = Pose::new(joints);

        let flat = pose.flatten();
        assert_eq!(flat.len(), FEATURES_PER_POSE);
        assert_eq!(flat[30], 0.1);
        assert_eq!(flat[31], 0.2);
        assert_eq!(flat[32], 0.3);

        let rebuilt = Pose::from_flat(&flat).unwrap();
        assert_eq!(rebuilt, pose);
    }

    #[test]
    fn test_pose_from_flat_wrong_length() {
        assert!(Pose::from_flat(&[0.0; 50]).is_none());
        assert!(Pose::from_flat(&[0.0; 52]).is_none());
    }

    #[test]
    fn test_pose_is_zero() {
        assert!(Pose::default().is_zero());

        let mut joints = [[0.0; 3]; JointIndex::COUNT];
        joints[3][1] = 0.5;
        assert!(!Pose::new(joints).is_zero());
    }

    #[test]
    fn test_sequence_frame_range() {
        let seq = PoseSequence::new("w01", vec![Pose::default(); 4]).with_frame_range(10, 14);
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.frame_range, Some((10, 14)));
        assert_eq!(seq.to_string(), "w01 (4 frames)");
    }
}
