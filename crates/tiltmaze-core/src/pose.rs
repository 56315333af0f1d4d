//! Rigid pose value type shared across the pipeline.

use nalgebra::{Rotation3, Vector3};

/// Board pose relative to the camera, as produced by a fiducial detector.
///
/// The rotation is a scaled-axis (Rodrigues) vector and the translation is
/// in the same metric units as the board geometry. Both are camera-centric
/// and double precision. A `RigidPose` is a pure value: the detector emits
/// a fresh one every frame and nothing holds onto it across frames except
/// the pose filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidPose {
    /// Rotation as a scaled axis-angle vector (board frame -> camera frame).
    pub rvec: Vector3<f64>,
    /// Translation of the board origin in camera coordinates.
    pub tvec: Vector3<f64>,
}

impl RigidPose {
    pub fn new(rvec: Vector3<f64>, tvec: Vector3<f64>) -> Self {
        Self { rvec, tvec }
    }

    /// Build a pose from a rotation matrix and a translation.
    pub fn from_rotation(rotation: &Rotation3<f64>, tvec: Vector3<f64>) -> Self {
        Self {
            rvec: rotation.scaled_axis(),
            tvec,
        }
    }

    /// Rotation matrix corresponding to `rvec`.
    #[inline]
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::new(self.rvec)
    }

    /// A pose is usable only when every component is finite.
    ///
    /// Detectors can emit NaN/inf vectors when a solve diverges; callers
    /// treat such poses as "no detection this frame".
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rvec.iter().chain(self.tvec.iter()).all(|v| v.is_finite())
    }
}
