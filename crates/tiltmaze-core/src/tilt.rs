//! Tilt-to-gravity projection.
//!
//! Maps the board's orientation, measured against the latched flat
//! reference, into a planar acceleration for the ball. The world-down
//! vector is fixed in the flat board's own frame, so the result only
//! depends on how far the board has tilted from its resting pose and is
//! independent of where the camera happens to be mounted.

use nalgebra::{Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Down direction in the flat board's frame: the board surface normal
/// points towards +z, so gravity pulls along -z.
const WORLD_DOWN: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

fn default_magnitude() -> f64 {
    9.81
}

fn default_gain() -> f64 {
    1.0
}

fn default_deadzone() -> f64 {
    0.03
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum TiltError {
    #[error("deadzone must be in [0, 1), got {deadzone}")]
    InvalidDeadzone { deadzone: f64 },
    #[error("gravity magnitude must be finite and >= 0, got {magnitude}")]
    InvalidMagnitude { magnitude: f64 },
    #[error("gain must be finite and >= 0, got {gain}")]
    InvalidGain { gain: f64 },
}

/// Tuning for the tilt-to-acceleration mapping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TiltParams {
    /// Gravity strength in physical units (m/s^2 for a metric board).
    #[serde(default = "default_magnitude")]
    pub magnitude: f64,
    /// Global multiplier on the applied acceleration.
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Tilt components below this magnitude are suppressed entirely.
    #[serde(default = "default_deadzone")]
    pub deadzone: f64,
}

impl Default for TiltParams {
    fn default() -> Self {
        Self {
            magnitude: default_magnitude(),
            gain: default_gain(),
            deadzone: default_deadzone(),
        }
    }
}

impl TiltParams {
    pub fn validate(&self) -> Result<(), TiltError> {
        if !self.deadzone.is_finite() || !(0.0..1.0).contains(&self.deadzone) {
            return Err(TiltError::InvalidDeadzone {
                deadzone: self.deadzone,
            });
        }
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(TiltError::InvalidMagnitude {
                magnitude: self.magnitude,
            });
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(TiltError::InvalidGain { gain: self.gain });
        }
        Ok(())
    }
}

/// Deadzone shaping that stays continuous at the boundary.
///
/// Inside the deadzone the output is exactly zero; outside it ramps from 0
/// at the boundary back up to `sign(v)` as `|v|` approaches 1, instead of
/// jumping. This keeps detector jitter from nudging the ball while small
/// deliberate tilts still register smoothly.
pub fn apply_deadzone(v: f64, deadzone: f64) -> f64 {
    if v.abs() < deadzone {
        return 0.0;
    }
    v.signum() * (v.abs() - deadzone) / (1.0 - deadzone)
}

/// Project gravity into the board plane.
///
/// `current` and `reference` are board-to-camera rotations. The relative
/// rotation `Rrel = R0^T * R` isolates tilt from the resting orientation;
/// pulling the fixed down vector back through `Rrel^T` expresses it in the
/// current board frame, whose x/y components drive the ball. The sign flip
/// makes a down-tilted edge attract the ball.
pub fn planar_acceleration(
    current: &Rotation3<f64>,
    reference: &Rotation3<f64>,
    params: &TiltParams,
) -> Vector2<f64> {
    let relative = reference.transpose() * current;
    let g_board = relative.transpose() * WORLD_DOWN;

    let ax = apply_deadzone(g_board.x, params.deadzone);
    let ay = apply_deadzone(g_board.y, params.deadzone);

    Vector2::new(-ax, -ay) * (params.magnitude * params.gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn deadzone_suppresses_small_inputs_exactly() {
        for v in [0.0, 0.01, -0.029, 0.0299] {
            assert_eq!(apply_deadzone(v, 0.03), 0.0, "input {v}");
        }
    }

    #[test]
    fn deadzone_is_continuous_at_the_boundary() {
        let dz = 0.03;
        let just_outside = apply_deadzone(dz + 1e-9, dz);
        assert!(just_outside >= 0.0 && just_outside < 1e-6);

        let just_outside_neg = apply_deadzone(-dz - 1e-9, dz);
        assert!(just_outside_neg <= 0.0 && just_outside_neg > -1e-6);
    }

    #[test]
    fn deadzone_output_is_monotonic_and_reaches_one() {
        let dz = 0.03;
        let mut prev = 0.0;
        let mut v = dz;
        while v <= 1.0 {
            let out = apply_deadzone(v, dz);
            assert!(out >= prev, "not monotonic at {v}");
            prev = out;
            v += 0.01;
        }
        assert_relative_eq!(apply_deadzone(1.0, dz), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_deadzone_passes_through() {
        assert_relative_eq!(apply_deadzone(0.37, 0.0), 0.37, epsilon = 1e-12);
        assert_relative_eq!(apply_deadzone(-0.37, 0.0), -0.37, epsilon = 1e-12);
    }

    #[test]
    fn level_board_produces_no_acceleration() {
        let params = TiltParams::default();
        let rot = Rotation3::from_euler_angles(0.4, -0.2, 1.0);
        // Whatever the camera-relative orientation, zero relative tilt
        // means zero planar gravity.
        let accel = planar_acceleration(&rot, &rot, &params);
        assert_relative_eq!(accel, Vector2::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn pitch_about_y_drives_the_x_axis() {
        let params = TiltParams {
            deadzone: 0.0,
            ..TiltParams::default()
        };
        let theta = 0.2_f64;
        let reference = Rotation3::identity();
        let current = Rotation3::from_axis_angle(&Vector3::y_axis(), theta);

        let accel = planar_acceleration(&current, &reference, &params);
        assert_relative_eq!(accel.x, -theta.sin() * params.magnitude, epsilon = 1e-12);
        assert_relative_eq!(accel.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn acceleration_ignores_camera_mounting() {
        let params = TiltParams {
            deadzone: 0.0,
            ..TiltParams::default()
        };
        let tilt = Rotation3::from_euler_angles(0.15, -0.1, 0.0);

        let flat = planar_acceleration(&tilt, &Rotation3::identity(), &params);
        for mount in [
            Rotation3::from_euler_angles(0.7, 0.0, 0.3),
            Rotation3::from_euler_angles(-1.2, 0.4, 0.0),
        ] {
            let mounted = planar_acceleration(&(mount * tilt), &mount, &params);
            assert_relative_eq!(mounted, flat, epsilon = 1e-12);
        }
    }

    #[test]
    fn tiny_tilt_stays_inside_the_deadzone() {
        let params = TiltParams::default();
        let current = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.01);
        let accel = planar_acceleration(&current, &Rotation3::identity(), &params);
        assert_eq!(accel, Vector2::zeros());
    }

    #[test]
    fn params_are_validated() {
        assert!(TiltParams::default().validate().is_ok());

        let bad = TiltParams {
            deadzone: 1.0,
            ..TiltParams::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(TiltError::InvalidDeadzone { .. })
        ));

        let bad = TiltParams {
            magnitude: f64::NAN,
            ..TiltParams::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(TiltError::InvalidMagnitude { .. })
        ));

        let bad = TiltParams {
            gain: -1.0,
            ..TiltParams::default()
        };
        assert!(matches!(bad.validate(), Err(TiltError::InvalidGain { .. })));
    }
}
