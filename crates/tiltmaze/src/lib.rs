//! High-level facade crate for the `tiltmaze-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the underlying pipeline crates
//! - the per-frame orchestration ([`GameSession`]) that turns raw board
//!   detections into smoothed poses, planar gravity and ball motion
//! - the collaborator seams ([`FrameSource`], [`BoardDetector`]) behind
//!   which capture and fiducial detection live, and the blocking
//!   [`run_session`] loop that drives everything with wall-clock time.
//!
//! ## Quickstart
//!
//! ```
//! use tiltmaze::{GameSession, SessionConfig};
//! use tiltmaze::core::RigidPose;
//! use nalgebra::Vector3;
//!
//! # fn main() -> Result<(), tiltmaze::SessionError> {
//! let mut session = GameSession::new(SessionConfig::default())?;
//!
//! // One frame: a detection straight above the board, slightly tilted.
//! let raw = RigidPose::new(Vector3::new(0.0, 0.1, 0.0), Vector3::new(0.0, 0.0, 0.4));
//! let update = session.advance(1.0 / 60.0, Some(raw));
//! println!("ball at {:?}", update.ball_position);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `tiltmaze::core`: pose smoothing, flat-reference latch, tilt projection.
//! - `tiltmaze::maze`: maze generation and ball dynamics.
//! - `tiltmaze::camera`: calibration artifact and render matrices.

pub use tiltmaze_camera as camera;
pub use tiltmaze_core as core;
pub use tiltmaze_maze as maze;

mod run;
mod session;

pub use run::{run_session, BoardDetector, CaptureError, FrameSource, RunError, SessionCommand};
pub use session::{FrameUpdate, GameSession, SessionConfig, SessionError, SessionIoError};
