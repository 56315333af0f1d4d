//! Headless tilt-maze demo.
//!
//! Stands a scripted board "detector" in for the real camera + fiducial
//! stack and runs the full session loop: pose smoothing, flat-reference
//! latch, gravity projection and ball dynamics, with the ball trajectory
//! going to the log. Pass a calibration artifact to exercise the
//! intrinsics/projection path as well.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use tiltmaze::camera::{CalibrationIoError, CameraCalibration};
use tiltmaze::core::init_with_level;
use tiltmaze::{
    run_session, GameSession, RunError, SessionCommand, SessionConfig, SessionError,
    SessionIoError,
};

mod script;

use script::{ScriptedDetector, SyntheticCapture, TiltScript};

#[derive(Debug, Parser)]
#[command(name = "tiltmaze", about = "AR tilt-maze pipeline demo (synthetic detector)")]
struct Args {
    /// Session config JSON; flags below override nothing when this is set.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Maze cells along x.
    #[clap(long, default_value_t = 8)]
    cells_x: u32,

    /// Maze cells along y.
    #[clap(long, default_value_t = 6)]
    cells_y: u32,

    /// Maze seed; omit for a fresh maze.
    #[clap(long)]
    seed: Option<u64>,

    /// Pose smoothing factor in (0, 1].
    #[clap(long, default_value_t = 0.25)]
    alpha: f64,

    /// Demo duration in seconds.
    #[clap(long, default_value_t = 10.0)]
    duration: f64,

    /// Synthetic capture rate.
    #[clap(long, default_value_t = 60.0)]
    fps: f64,

    /// Drop every Nth detection to exercise dropout handling (0 = never).
    #[clap(long, default_value_t = 0)]
    dropout_every: u64,

    /// Recapture "flat" at this time, like pressing the reset key.
    #[clap(long)]
    reset_at: Option<f64>,

    /// Calibration artifact (JSON); validated at startup.
    #[clap(long)]
    calibration: Option<PathBuf>,

    /// Live frame size the intrinsics are rescaled to.
    #[clap(long, default_value_t = 1280)]
    frame_width: u32,

    #[clap(long, default_value_t = 720)]
    frame_height: u32,

    #[clap(long, default_value = "info")]
    log_level: String,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("invalid calibration artifact: {0}")]
    Calibration(#[from] CalibrationIoError),
    #[error("invalid session config: {0}")]
    Session(#[from] SessionError),
    #[error("could not read session config: {0}")]
    SessionIo(#[from] SessionIoError),
    #[error(transparent)]
    Run(#[from] RunError),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = LevelFilter::from_str(&args.log_level).unwrap_or(LevelFilter::Info);
    let _ = init_with_level(level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    // Fatal-at-startup path: no intrinsics, no meaningful AR overlay.
    if let Some(path) = &args.calibration {
        let calibration = CameraCalibration::load_json(path)?;
        let intrinsics = calibration.intrinsics_for(args.frame_width, args.frame_height);
        let projection = tiltmaze::camera::clip_projection(
            &intrinsics,
            args.frame_width as f64,
            args.frame_height as f64,
            0.01,
            2000.0,
        );
        log::info!("calibration ok: {intrinsics:?}");
        log::debug!("projection matrix: {projection:.5}");
    }

    let config = match &args.config {
        Some(path) => SessionConfig::load_json(path)?,
        None => {
            let mut config = SessionConfig::default();
            config.maze.cells_x = args.cells_x;
            config.maze.cells_y = args.cells_y;
            config.maze_seed = args.seed;
            config.smoothing_alpha = args.alpha;
            config
        }
    };

    let mut session = GameSession::new(config)?;

    let frame_interval = Duration::from_secs_f64(1.0 / args.fps.max(1.0));
    let total_frames = (args.duration.max(0.0) * args.fps) as u64;
    let mut capture = SyntheticCapture::new(total_frames, frame_interval);
    let mut detector = ScriptedDetector::new(TiltScript::default(), args.dropout_every);

    let reset_frame = args.reset_at.map(|t| (t * args.fps) as u64);
    let log_every = args.fps.max(1.0) as u64;
    let mut frame: u64 = 0;

    run_session(&mut capture, &mut detector, &mut session, |update| {
        frame += 1;
        if frame % log_every == 0 {
            log::info!(
                "t={:6.2}s ball=({:.4}, {:.4}) accel=({:+.3}, {:+.3}){}",
                frame as f64 * frame_interval.as_secs_f64(),
                update.ball_position.x,
                update.ball_position.y,
                update.acceleration.x,
                update.acceleration.y,
                if update.fresh_detection { "" } else { " [no detection]" },
            );
        }
        if reset_frame == Some(frame) {
            log::info!("manual flat-reference reset");
            return SessionCommand::ResetReference;
        }
        SessionCommand::Continue
    })?;

    let final_pos = session.ball().position;
    log::info!("done: ball ended at ({:.4}, {:.4})", final_pos.x, final_pos.y);
    Ok(())
}
