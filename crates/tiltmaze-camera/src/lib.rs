//! Camera-side plumbing for the tilt-maze pipeline.
//!
//! Two concerns live here: reading and validating the offline calibration
//! artifact (pinhole intrinsics plus distortion), and the deterministic
//! algebra that turns intrinsics and a board pose into rendering-ready
//! projection and model matrices.

mod calibration;
mod matrices;

pub use calibration::{CalibrationError, CalibrationIoError, CameraCalibration, Intrinsics};
pub use matrices::{clip_projection, model_from_pose, VISION_TO_RENDER};
