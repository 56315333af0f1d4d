//! Maze generation and ball dynamics.
//!
//! The maze is a perfect grid maze (spanning tree over the cells) carved
//! with a randomized depth-first search; the ball is a point mass with a
//! radius, integrated with semi-implicit Euler against the cell walls.
//! Both are plain state objects with no rendering or capture dependencies.

mod ball;
mod grid;

pub use ball::{Ball, BallError, BallParams};
pub use grid::{Cell, Maze, MazeSpec, MazeSpecError, Side};
