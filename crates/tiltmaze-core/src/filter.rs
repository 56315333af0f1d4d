//! Temporal pose smoothing.
//!
//! Exponential smoothing of a per-frame rigid pose: the translation is
//! blended linearly (EMA) while the rotation goes through a unit
//! quaternion and is interpolated with SLERP, with the quaternion sign
//! corrected first so the double cover of SO(3) never produces a visible
//! snap between frames.

use nalgebra::UnitQuaternion;

use crate::pose::RigidPose;

/// Default smoothing factor. Smaller values smooth harder and lag more.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.20;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum FilterError {
    #[error("smoothing alpha must be finite and in (0, 1], got {alpha}")]
    InvalidAlpha { alpha: f64 },
}

/// Stateful exponential pose smoother.
///
/// The filter is an explicit state object owned by the frame loop; there is
/// no global state, so it can be driven from tests without a camera.
#[derive(Clone, Debug)]
pub struct PoseFilter {
    alpha: f64,
    state: Option<RigidPose>,
}

impl Default for PoseFilter {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
            state: None,
        }
    }
}

impl PoseFilter {
    /// Create a filter with the given smoothing factor in `(0, 1]`.
    ///
    /// `alpha = 1` disables smoothing entirely (raw passthrough).
    pub fn new(alpha: f64) -> Result<Self, FilterError> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(FilterError::InvalidAlpha { alpha });
        }
        Ok(Self { alpha, state: None })
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether a previous pose has been latched already.
    #[inline]
    pub fn has_pose(&self) -> bool {
        self.state.is_some()
    }

    /// Last emitted pose, if any.
    #[inline]
    pub fn last(&self) -> Option<&RigidPose> {
        self.state.as_ref()
    }

    /// Forget the stored pose; the next call to [`smooth`](Self::smooth)
    /// passes its input through verbatim again.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Blend a raw detection into the smoothed state and return the result.
    ///
    /// The first call after construction or [`reset`](Self::reset) stores
    /// and returns `raw` unchanged. A non-finite pose is ignored and `None`
    /// is returned without touching the state.
    pub fn smooth(&mut self, raw: &RigidPose) -> Option<RigidPose> {
        if !raw.is_finite() {
            return None;
        }

        let Some(prev) = self.state else {
            self.state = Some(*raw);
            return Some(*raw);
        };

        let tvec = prev.tvec.lerp(&raw.tvec, self.alpha);

        let q_prev = UnitQuaternion::from_rotation_matrix(&prev.rotation());
        let mut q_raw = UnitQuaternion::from_rotation_matrix(&raw.rotation());

        // q and -q encode the same rotation; pick the representative on the
        // same hemisphere as the previous state before interpolating.
        if q_raw.coords.dot(&q_prev.coords) < 0.0 {
            q_raw = UnitQuaternion::new_unchecked(-q_raw.into_inner());
        }

        // After the sign fix the pair is never antipodal, so the slerp is
        // well defined; fall back to the raw sample on numerical failure.
        let q = q_prev.try_slerp(&q_raw, self.alpha, 1.0e-9).unwrap_or(q_raw);

        let smoothed = RigidPose::new(q.scaled_axis(), tvec);
        self.state = Some(smoothed);
        Some(smoothed)
    }
}
