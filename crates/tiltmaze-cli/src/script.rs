//! Synthetic capture and scripted board detection.
//!
//! The capture source paces itself like a camera (one blocking sleep per
//! frame); the detector replays a smooth rocking motion of the board with
//! optional per-component jitter, so the smoothing filter has something
//! realistic to chew on.

use std::thread;
use std::time::Duration;

use nalgebra::{Rotation3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tiltmaze::core::RigidPose;
use tiltmaze::{BoardDetector, CaptureError, FrameSource};

/// A stand-in for a video frame: just its timestamp.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticFrame {
    pub index: u64,
    pub t: f64,
}

/// Paced frame source that ends after a fixed number of frames.
pub struct SyntheticCapture {
    remaining: u64,
    interval: Duration,
    index: u64,
}

impl SyntheticCapture {
    pub fn new(frames: u64, interval: Duration) -> Self {
        Self {
            remaining: frames,
            interval,
            index: 0,
        }
    }
}

impl FrameSource for SyntheticCapture {
    type Frame = SyntheticFrame;

    fn next_frame(&mut self) -> Result<Option<SyntheticFrame>, CaptureError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        thread::sleep(self.interval);
        let frame = SyntheticFrame {
            index: self.index,
            t: self.index as f64 * self.interval.as_secs_f64(),
        };
        self.index += 1;
        self.remaining -= 1;
        Ok(Some(frame))
    }
}

/// Rocking-board motion: sinusoidal pitch and roll at slightly different
/// frequencies, board held ~40 cm from the camera.
#[derive(Clone, Copy, Debug)]
pub struct TiltScript {
    pub pitch_amplitude: f64,
    pub roll_amplitude: f64,
    pub frequency: f64,
    pub distance: f64,
    /// Uniform jitter added to each rvec/tvec component, simulating
    /// detector noise.
    pub jitter: f64,
}

impl Default for TiltScript {
    fn default() -> Self {
        Self {
            pitch_amplitude: 0.25,
            roll_amplitude: 0.18,
            frequency: 0.2,
            distance: 0.4,
            jitter: 0.002,
        }
    }
}

impl TiltScript {
    fn pose_at(&self, t: f64, rng: &mut impl Rng) -> RigidPose {
        let w = 2.0 * std::f64::consts::PI * self.frequency;
        let pitch = self.pitch_amplitude * (w * t).sin();
        let roll = self.roll_amplitude * (w * 1.37 * t).cos();

        let rotation = Rotation3::from_euler_angles(pitch, roll, 0.0);
        let mut rvec = rotation.scaled_axis();
        let mut tvec = Vector3::new(0.0, 0.0, self.distance);

        if self.jitter > 0.0 {
            for v in rvec.iter_mut().chain(tvec.iter_mut()) {
                *v += rng.gen_range(-self.jitter..=self.jitter);
            }
        }
        RigidPose::new(rvec, tvec)
    }
}

/// Deterministic detector replaying a [`TiltScript`].
pub struct ScriptedDetector {
    script: TiltScript,
    rng: ChaCha8Rng,
    /// Report "no markers" on every Nth frame (0 disables dropouts).
    dropout_every: u64,
}

impl ScriptedDetector {
    pub fn new(script: TiltScript, dropout_every: u64) -> Self {
        Self {
            script,
            rng: ChaCha8Rng::seed_from_u64(7),
            dropout_every,
        }
    }
}

impl BoardDetector<SyntheticFrame> for ScriptedDetector {
    fn detect(&mut self, frame: &SyntheticFrame) -> Option<RigidPose> {
        if self.dropout_every > 0 && frame.index > 0 && frame.index % self.dropout_every == 0 {
            return None;
        }
        Some(self.script.pose_at(frame.t, &mut self.rng))
    }
}
