//! Blocking frame loop and collaborator seams.
//!
//! Capture and fiducial detection are external collaborators; the loop
//! only requires the two traits below. Everything runs single-threaded:
//! one frame in flight, strictly capture -> detect -> advance -> render,
//! with wall-clock deltas feeding the session's timestep clamp.

use std::time::Instant;

use tiltmaze_core::RigidPose;

use crate::session::{FrameUpdate, GameSession};

/// Fatal capture failure: the loop cannot proceed without frames.
#[derive(thiserror::Error, Debug)]
#[error("frame capture failed: {reason}")]
pub struct CaptureError {
    pub reason: String,
}

impl CaptureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Blocking source of video frames.
pub trait FrameSource {
    type Frame;

    /// Block until the next frame arrives. `Ok(None)` means the stream
    /// ended cleanly (window closed, script finished); an error is fatal.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>, CaptureError>;
}

/// Fiducial board detector over frames of type `F`.
///
/// `None` is the transient "no markers / not enough corners" case and
/// must never abort the session.
pub trait BoardDetector<F> {
    fn detect(&mut self, frame: &F) -> Option<RigidPose>;
}

/// What the per-frame callback wants the loop to do next.
///
/// The callback is where rendering and input live; a pressed reset key
/// becomes [`SessionCommand::ResetReference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Continue,
    ResetReference,
    Exit,
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Drive a session until the source ends, the callback exits, or capture
/// fails.
pub fn run_session<S, D>(
    source: &mut S,
    detector: &mut D,
    session: &mut GameSession,
    mut on_frame: impl FnMut(&FrameUpdate) -> SessionCommand,
) -> Result<(), RunError>
where
    S: FrameSource,
    D: BoardDetector<S::Frame>,
{
    let mut last = Instant::now();
    let mut frames: u64 = 0;
    let mut missed: u64 = 0;

    while let Some(frame) = source.next_frame()? {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let detection = detector.detect(&frame);
        if detection.is_none() {
            missed += 1;
        }
        frames += 1;

        let update = session.advance(dt, detection);
        match on_frame(&update) {
            SessionCommand::Continue => {}
            SessionCommand::ResetReference => session.reset_reference(),
            SessionCommand::Exit => break,
        }
    }

    log::info!("session ended after {frames} frames ({missed} without detection)");
    Ok(())
}
