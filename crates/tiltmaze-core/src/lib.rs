//! Pose-side core of the tilt-maze pipeline.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete board detector, capture backend or renderer:
//! it turns noisy per-frame rigid poses into a stable orientation signal
//! and projects that signal into a planar acceleration.

mod filter;
mod logger;
mod pose;
mod reference;
mod tilt;

pub use filter::{FilterError, PoseFilter, DEFAULT_SMOOTHING_ALPHA};
pub use logger::init_with_level;
pub use pose::RigidPose;
pub use reference::ReferenceFrame;
pub use tilt::{apply_deadzone, planar_acceleration, TiltError, TiltParams};
