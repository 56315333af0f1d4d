//! Flat-reference orientation latch.
//!
//! The gravity projection measures tilt *relative to the board's own
//! resting orientation*, not relative to the camera. The reference frame
//! captures that resting orientation exactly once: on the first valid
//! detection after startup, or again on an explicit user reset. Without
//! it the simulated gravity would be tied to the camera mounting angle.

use nalgebra::Rotation3;

/// Latched "board is level" orientation.
///
/// At most one reference is active at a time and it is never overwritten
/// silently: only [`relatch`](Self::relatch) and [`clear`](Self::clear)
/// replace or drop an active reference.
#[derive(Clone, Debug, Default)]
pub struct ReferenceFrame {
    rotation: Option<Rotation3<f64>>,
}

impl ReferenceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_latched(&self) -> bool {
        self.rotation.is_some()
    }

    /// Active reference rotation, if one has been latched.
    #[inline]
    pub fn rotation(&self) -> Option<&Rotation3<f64>> {
        self.rotation.as_ref()
    }

    /// Latch `rotation` as the flat baseline if none is active yet.
    ///
    /// Returns `true` when this call latched, `false` when a reference was
    /// already active (the call is then a no-op).
    pub fn maybe_latch(&mut self, rotation: &Rotation3<f64>) -> bool {
        if self.rotation.is_some() {
            return false;
        }
        self.rotation = Some(*rotation);
        log::debug!("flat reference latched");
        true
    }

    /// Explicitly replace the flat baseline (manual recalibration).
    pub fn relatch(&mut self, rotation: &Rotation3<f64>) {
        self.rotation = Some(*rotation);
        log::debug!("flat reference re-latched");
    }

    /// Drop the active reference so the next detection latches again.
    pub fn clear(&mut self) {
        self.rotation = None;
    }
}
