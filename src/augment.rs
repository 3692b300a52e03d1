//! Synthetic augmentation of normalized samples.
//!
//! Each input sample expands into a fixed set of variants: the identity,
//! Gaussian coordinate noise, a horizontal mirror, an isotropic x/y scale
//! jitter, and a configurable number of small planar rotations. Every
//! variant is computed from the original sample, never chained from another
//! variant, so distortions cannot compound. Labels and provenance flags are
//! carried over unchanged.
//!
//! Mirroring convention: samples reach the augmentor after geometric
//! normalization, which centers the root joint at the origin, so the mirror
//! is `x' = -x`. The same convention applies to every sample in a run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::dataset::Sample;
use crate::pose::Pose;

/// Augmentation parameters.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    /// Standard deviation of the additive Gaussian noise, applied
    /// independently per coordinate.
    pub noise_std: f32,
    /// Isotropic scale jitter range for x and y (z untouched).
    pub scale_range: (f32, f32),
    /// Planar rotation angles are drawn from `[-rotation_range,
    /// rotation_range]` radians.
    pub rotation_range: f32,
    /// Number of independently drawn rotation variants.
    pub rotations: usize,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            noise_std: 0.01,
            scale_range: (0.95, 1.05),
            rotation_range: 0.1,
            rotations: 2,
        }
    }
}

impl AugmentConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Gaussian noise standard deviation.
    #[must_use]
    pub const fn with_noise_std(mut self, std: f32) -> Self {
        self.noise_std = std;
        self
    }

    /// Set the x/y scale jitter range.
    #[must_use]
    pub const fn with_scale_range(mut self, low: f32, high: f32) -> Self {
        self.scale_range = (low, high);
        self
    }

    /// Set the maximum rotation angle in radians.
    #[must_use]
    pub const fn with_rotation_range(mut self, radians: f32) -> Self {
        self.rotation_range = radians;
        self
    }

    /// Set the number of rotation variants.
    #[must_use]
    pub const fn with_rotations(mut self, count: usize) -> Self {
        self.rotations = count;
        self
    }

    /// Samples produced per input sample: identity + noise + mirror +
    /// scale + rotations.
    #[must_use]
    pub const fn factor(&self) -> usize {
        4 + self.rotations
    }
}

/// Seeded sample augmentor.
///
/// Randomness comes from an explicitly seeded [`StdRng`], not ambient global
/// state: the same seed over the same input reproduces the exact output
/// vectors, which tests rely on.
#[derive(Debug)]
pub struct Augmentor {
    config: AugmentConfig,
    rng: StdRng,
}

impl Augmentor {
    #[must_use]
    pub fn new(config: AugmentConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Expand one sample into its variant set.
    ///
    /// The identity comes first; all other variants derive from the
    /// original pose.
    #[must_use]
    pub fn augment(&mut self, sample: &Sample) -> Vec<Sample> {
        let mut out = Vec::with_capacity(self.config.factor());
        out.push(sample.clone());
        out.push(sample.derive(self.add_noise(&sample.pose)));
        out.push(sample.derive(mirror_x(&sample.pose)));
        out.push(sample.derive(self.scale_jitter(&sample.pose)));
        for _ in 0..self.config.rotations {
            out.push(sample.derive(self.rotate(&sample.pose)));
        }
        out
    }

    /// Expand a batch, preserving input order.
    #[must_use]
    pub fn augment_all(&mut self, samples: &[Sample]) -> Vec<Sample> {
        let mut out = Vec::with_capacity(samples.len() * self.config.factor());
        for sample in samples {
            out.extend(self.augment(sample));
        }
        out
    }

    fn add_noise(&mut self, pose: &Pose) -> Pose {
        // noise_std is a small positive constant; Normal::new only fails on
        // non-finite parameters.
        let normal = Normal::new(0.0f32, self.config.noise_std)
            .unwrap_or_else(|_| Normal::new(0.0, 0.01).expect("valid fallback sigma"));
        let mut joints = pose.joints;
        for joint in &mut joints {
            for coord in joint.iter_mut() {
                *coord += normal.sample(&mut self.rng);
            }
        }
        Pose::new(joints)
    }

    fn scale_jitter(&mut self, pose: &Pose) -> Pose {
        let (lo, hi) = self.config.scale_range;
        let factor = self.rng.gen_range(lo..=hi);
        let mut joints = pose.joints;
        for joint in &mut joints {
            joint[0] *= factor;
            joint[1] *= factor;
        }
        Pose::new(joints)
    }

    fn rotate(&mut self, pose: &Pose) -> Pose {
        let r = self.config.rotation_range;
        let angle = self.rng.gen_range(-r..=r);
        let (sin, cos) = angle.sin_cos();
        let mut joints = pose.joints;
        for joint in &mut joints {
            let (x, y) = (joint[0], joint[1]);
            joint[0] = x * cos - y * sin;
            joint[1] = x * sin + y * cos;
        }
        Pose::new(joints)
    }
}

/// Horizontal mirror about the normalized center.
fn mirror_x(pose: &Pose) -> Pose {
    let mut joints = pose.joints;
    for joint in &mut joints {
        joint[0] = -joint[0];
    }
    Pose::new(joints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointIndex;

    fn sample() -> Sample {
        let mut joints = [[0.0f32; 3]; JointIndex::COUNT];
        joints[1] = [0.6, -0.2, 0.1];
        joints[2] = [-0.3, 0.8, 0.0];
        Sample::new(Pose::new(joints), "plank", false)
    }

    #[test]
    fn test_default_factor_is_six() {
        assert_eq!(AugmentConfig::default().factor(), 6);
    }

    #[test]
    fn test_augment_count_and_labels() {
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let variants = augmentor.augment(&sample());
        assert_eq!(variants.len(), 6);
        for v in &variants {
            assert_eq!(v.label, "plank");
            assert!(!v.verified);
        }
    }

    #[test]
    fn test_identity_comes_first() {
        let original = sample();
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let variants = augmentor.augment(&original);
        assert_eq!(variants[0], original);
    }

    #[test]
    fn test_mirror_negates_x_only() {
        let original = sample();
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let mirrored = &augmentor.augment(&original)[2];
        for (m, o) in mirrored.pose.joints.iter().zip(original.pose.joints.iter()) {
            assert_eq!(m[0], -o[0]);
            assert_eq!(m[1], o[1]);
            assert_eq!(m[2], o[2]);
        }
    }

    #[test]
    fn test_scale_leaves_z_unchanged() {
        let original = sample();
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let scaled = &augmentor.augment(&original)[3];
        for (s, o) in scaled.pose.joints.iter().zip(original.pose.joints.iter()) {
            assert_eq!(s[2], o[2]);
        }
        // Scale factor stays within the configured range.
        let ratio = scaled.pose.joints[1][0] / original.pose.joints[1][0];
        assert!((0.95..=1.05).contains(&ratio));
    }

    #[test]
    fn test_rotation_preserves_planar_radius_and_z() {
        let original = sample();
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let rotated = &augmentor.augment(&original)[4];
        for (r, o) in rotated.pose.joints.iter().zip(original.pose.joints.iter()) {
            let ro = (o[0] * o[0] + o[1] * o[1]).sqrt();
            let rr = (r[0] * r[0] + r[1] * r[1]).sqrt();
            assert!((ro - rr).abs() < 1e-5);
            assert_eq!(r[2], o[2]);
        }
    }

    #[test]
    fn test_variants_not_chained() {
        // The mirror variant must mirror the original, not the noise
        // variant: exact negation would be destroyed by noise.
        let original = sample();
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 99);
        let variants = augmentor.augment(&original);
        assert_eq!(variants[2].pose.joints[1][0], -original.pose.joints[1][0]);
    }

    #[test]
    fn test_same_seed_reproduces_output() {
        let original = sample();
        let a = Augmentor::new(AugmentConfig::default(), 1234).augment(&original);
        let b = Augmentor::new(AugmentConfig::default(), 1234).augment(&original);
        assert_eq!(a, b);

        let c = Augmentor::new(AugmentConfig::default(), 4321).augment(&original);
        assert_ne!(a[1].pose, c[1].pose);
    }

    #[test]
    fn test_configurable_rotations() {
        let config = AugmentConfig::new().with_rotations(4);
        assert_eq!(config.factor(), 8);
        let mut augmentor = Augmentor::new(config, 7);
        assert_eq!(augmentor.augment(&sample()).len(), 8);
    }

    #[test]
    fn test_augment_all_order() {
        let s1 = sample();
        let s2 = Sample::new(s1.pose, "squat", true);
        let mut augmentor = Augmentor::new(AugmentConfig::default(), 7);
        let out = augmentor.augment_all(&[s1, s2]);
        assert_eq!(out.len(), 12);
        assert_eq!(out[0].label, "plank");
        assert_eq!(out[6].label, "squat");
        assert!(out[6].verified);
    }
}
