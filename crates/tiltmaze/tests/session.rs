//! End-to-end session scenario: an 8x6 maze on an A4 sheet, driven by a
//! constant board tilt for one simulated second at 60 fps.

use nalgebra::{Vector2, Vector3};
use tiltmaze::core::RigidPose;
use tiltmaze::maze::Side;
use tiltmaze::{GameSession, SessionConfig};

const DT: f64 = 1.0 / 60.0;

fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        maze_seed: Some(seed),
        ..SessionConfig::default()
    }
}

fn flat_pose() -> RigidPose {
    RigidPose::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 0.4))
}

/// Board pitched about +y so that the down vector acquires an x-component
/// of -0.5 in the board frame; after the sign flip that pushes the ball
/// towards +x with |g_cur.x| = 0.5.
fn tilted_pose() -> RigidPose {
    let theta = -(0.5_f64).asin();
    RigidPose::new(Vector3::new(0.0, theta, 0.0), Vector3::new(0.0, 0.0, 0.4))
}

/// Plane (x coordinate) the ball cannot pass while rolling along row 0:
/// the east face of the first east-walled cell, or the sheet edge when
/// the row happens to be an open corridor.
fn stop_plane(session: &GameSession) -> f64 {
    let maze = session.maze();
    for x in 0..maze.cells_x() {
        if maze.has_wall(x, 0, Side::East) {
            return (x as f64 + 1.0) * maze.cell_width();
        }
    }
    maze.extent().x
}

#[test]
fn constant_tilt_drives_the_ball_into_the_first_wall() {
    let mut session = GameSession::new(config(21)).expect("session");
    let radius = session.ball().radius();
    let extent = session.maze().extent();

    // First detection latches "flat".
    let first = session.advance(DT, Some(flat_pose()));
    assert!(session.has_reference());
    let start = first.ball_position;

    let wall_x = stop_plane(&session);

    for _ in 0..60 {
        let update = session.advance(DT, Some(tilted_pose()));

        // Bounds invariant, every single frame.
        assert!(update.ball_position.x >= radius);
        assert!(update.ball_position.x <= extent.x - radius);
        assert!(update.ball_position.y >= radius);
        assert!(update.ball_position.y <= extent.y - radius);

        // The tilt is purely about y: no cross-axis drift.
        assert_eq!(update.ball_position.y, start.y);
        assert!(update.acceleration.y == 0.0);

        // Never past the first east wall in the starting row.
        assert!(update.ball_position.x + radius <= wall_x + 1e-9);
    }

    let after_one_second = session.ball().position;
    assert!(
        after_one_second.x > start.x + 0.01,
        "ball should have rolled towards +x, moved {}",
        after_one_second.x - start.x
    );

    // Keep pushing; the ball ends pinned against the wall plane, give or
    // take the decaying bounce.
    for _ in 0..120 {
        let update = session.advance(DT, Some(tilted_pose()));
        assert!(update.ball_position.x + radius <= wall_x + 1e-9);
    }
    let final_pos = session.ball().position;
    assert!(
        (wall_x - radius) - final_pos.x < 0.02,
        "ball should settle near the wall plane at {wall_x}, ended at {}",
        final_pos.x
    );
}

#[test]
fn detection_dropouts_do_not_move_the_ball() {
    let mut session = GameSession::new(config(21)).expect("session");
    session.advance(DT, Some(flat_pose()));

    // A few frames only, so the ball is still in free roll (not yet
    // bouncing off a wall) when tracking drops out.
    for _ in 0..3 {
        session.advance(DT, Some(tilted_pose()));
    }
    let held = session.ball().position;
    let pose_before = session.advance(DT, None).pose;

    for _ in 0..20 {
        let update = session.advance(DT, None);
        assert!(!update.fresh_detection);
        assert_eq!(update.ball_position, held);
        assert_eq!(update.pose, pose_before);
    }

    // Tracking recovers and physics resumes.
    let update = session.advance(DT, Some(tilted_pose()));
    assert!(update.fresh_detection);
    assert!(update.ball_position.x > held.x);
}

#[test]
fn fresh_sessions_differ_but_seeded_sessions_agree() {
    let a = GameSession::new(config(5)).expect("session");
    let b = GameSession::new(config(5)).expect("session");
    for y in 0..a.maze().cells_y() {
        for x in 0..a.maze().cells_x() {
            assert_eq!(a.maze().cell(x, y), b.maze().cell(x, y));
        }
    }

    // Ball starts centered in the first cell either way.
    assert_eq!(
        a.ball().position,
        Vector2::new(
            a.maze().cell_width() * 0.5,
            a.maze().cell_height() * 0.5
        )
    );
}
