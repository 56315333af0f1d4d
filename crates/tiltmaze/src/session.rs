//! Per-frame game orchestration.
//!
//! `GameSession` owns the full per-session state (pose filter, flat
//! reference, maze, ball) and sequences one frame at a time:
//! clamp dt -> smooth the detection -> latch the flat reference once ->
//! project gravity -> integrate the ball. Capture and detection stay
//! outside, behind the seams in [`crate::run`].

use nalgebra::Vector2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use tiltmaze_core::{
    planar_acceleration, FilterError, PoseFilter, ReferenceFrame, RigidPose, TiltError, TiltParams,
};
use tiltmaze_maze::{Ball, BallError, BallParams, Maze, MazeSpec, MazeSpecError};

fn default_alpha() -> f64 {
    0.25
}

fn default_dt_min() -> f64 {
    1.0 / 500.0
}

fn default_dt_max() -> f64 {
    1.0 / 20.0
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Tilt(#[from] TiltError),
    #[error(transparent)]
    Maze(#[from] MazeSpecError),
    #[error(transparent)]
    Ball(#[from] BallError),
    #[error("timestep clamp must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidTimestepClamp { min: f64, max: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum SessionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Session configuration. Every field has a sensible default for an 8x6
/// maze on an A4 sheet, so `SessionConfig::default()` is playable as-is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub maze: MazeSpec,
    /// Maze RNG seed; omitted means a fresh maze every session.
    #[serde(default)]
    pub maze_seed: Option<u64>,
    #[serde(default = "default_alpha")]
    pub smoothing_alpha: f64,
    #[serde(default)]
    pub tilt: TiltParams,
    #[serde(default)]
    pub ball: BallParams,
    /// Wall-clock timestep clamp, protecting the integrator from frame
    /// hitches and degenerate tiny deltas.
    #[serde(default = "default_dt_min")]
    pub dt_min: f64,
    #[serde(default = "default_dt_max")]
    pub dt_max: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            maze: MazeSpec::default(),
            maze_seed: None,
            smoothing_alpha: default_alpha(),
            tilt: TiltParams::default(),
            ball: BallParams::default(),
            dt_min: default_dt_min(),
            dt_max: default_dt_max(),
        }
    }
}

impl SessionConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Everything a renderer needs after one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameUpdate {
    /// Latest smoothed pose. Held across missed detections so the overlay
    /// keeps rendering at the last known board position; `None` only
    /// before the first successful detection.
    pub pose: Option<RigidPose>,
    /// Whether this frame contributed a fresh detection (and physics ran).
    pub fresh_detection: bool,
    /// Ball center in the maze plane, physical units.
    pub ball_position: Vector2<f64>,
    /// Planar acceleration applied this frame (zero when physics skipped).
    pub acceleration: Vector2<f64>,
    /// The clamped timestep the frame was integrated with.
    pub dt: f64,
}

/// Per-session state and frame sequencing.
pub struct GameSession {
    config: SessionConfig,
    filter: PoseFilter,
    reference: ReferenceFrame,
    maze: Maze,
    ball: Ball,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        if !config.dt_min.is_finite()
            || !config.dt_max.is_finite()
            || config.dt_min <= 0.0
            || config.dt_min > config.dt_max
        {
            return Err(SessionError::InvalidTimestepClamp {
                min: config.dt_min,
                max: config.dt_max,
            });
        }
        config.tilt.validate()?;

        let filter = PoseFilter::new(config.smoothing_alpha)?;
        let maze = match config.maze_seed {
            Some(seed) => Maze::generate_seeded(config.maze, seed)?,
            None => Maze::generate(config.maze, &mut ChaCha8Rng::from_entropy())?,
        };
        let mut ball = Ball::new(config.ball)?;
        ball.reset(&maze);

        log::info!(
            "session ready: {}x{} maze, alpha {}",
            config.maze.cells_x,
            config.maze.cells_y,
            config.smoothing_alpha
        );

        Ok(Self {
            config,
            filter,
            reference: ReferenceFrame::new(),
            maze,
            ball,
        })
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    #[inline]
    pub fn has_reference(&self) -> bool {
        self.reference.is_latched()
    }

    /// Advance the session by one frame.
    ///
    /// `detection` is the raw pose from the board detector, or `None` when
    /// no (or too few) markers were found this frame. A missed detection
    /// is transient by design: the last smoothed pose is held for
    /// rendering continuity and the physics step is skipped.
    pub fn advance(&mut self, dt: f64, detection: Option<RigidPose>) -> FrameUpdate {
        let dt = dt.clamp(self.config.dt_min, self.config.dt_max);

        let mut fresh_detection = false;
        let mut acceleration = Vector2::zeros();

        match detection {
            Some(raw) => {
                if let Some(smoothed) = self.filter.smooth(&raw) {
                    fresh_detection = true;
                    let rotation = smoothed.rotation();
                    self.reference.maybe_latch(&rotation);
                    if let Some(flat) = self.reference.rotation() {
                        acceleration = planar_acceleration(&rotation, flat, &self.config.tilt);
                    }
                    self.ball.step(dt, acceleration, &self.maze);
                } else {
                    log::warn!("ignoring non-finite detection");
                }
            }
            None => log::trace!("no board detection this frame"),
        }

        FrameUpdate {
            pose: self.filter.last().copied(),
            fresh_detection,
            ball_position: self.ball.position,
            acceleration,
            dt,
        }
    }

    /// Manual "recapture flat" action.
    ///
    /// Re-latches the flat reference from the current smoothed pose when
    /// one exists; before the first detection it merely re-arms the latch,
    /// which is what startup does anyway. The ball velocity is zeroed in
    /// both cases so the recalibrated board starts calm.
    pub fn reset_reference(&mut self) {
        match self.filter.last() {
            Some(pose) => self.reference.relatch(&pose.rotation()),
            None => self.reference.clear(),
        }
        self.ball.stop();
    }
}
