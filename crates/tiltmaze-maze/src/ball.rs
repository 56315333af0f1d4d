//! Ball dynamics against the maze walls.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::grid::Maze;

fn default_radius() -> f64 {
    0.010
}

fn default_friction() -> f64 {
    0.85
}

fn default_restitution() -> f64 {
    0.4
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum BallError {
    #[error("ball radius must be finite and > 0, got {radius}")]
    InvalidRadius { radius: f64 },
    #[error("friction must be in [0, 1], got {friction}")]
    InvalidFriction { friction: f64 },
    #[error("restitution must be in [0, 1], got {restitution}")]
    InvalidRestitution { restitution: f64 },
}

/// Ball tuning. All defaults match a 1 cm ball on an A4 sheet.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BallParams {
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Velocity retained after each integration step.
    ///
    /// Applied per step, not per second, so the effective damping depends
    /// on the frame rate. That is a deliberate carry-over from the
    /// reference behavior, not something to correct silently.
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Speed retained when bouncing off a wall (direction reversed).
    #[serde(default = "default_restitution")]
    pub restitution: f64,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            friction: default_friction(),
            restitution: default_restitution(),
        }
    }
}

impl BallParams {
    pub fn validate(&self) -> Result<(), BallError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(BallError::InvalidRadius {
                radius: self.radius,
            });
        }
        if !self.friction.is_finite() || !(0.0..=1.0).contains(&self.friction) {
            return Err(BallError::InvalidFriction {
                friction: self.friction,
            });
        }
        if !self.restitution.is_finite() || !(0.0..=1.0).contains(&self.restitution) {
            return Err(BallError::InvalidRestitution {
                restitution: self.restitution,
            });
        }
        Ok(())
    }
}

/// Ball state in the maze's physical 2D plane.
#[derive(Clone, Debug)]
pub struct Ball {
    params: BallParams,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

impl Ball {
    pub fn new(params: BallParams) -> Result<Self, BallError> {
        params.validate()?;
        Ok(Self {
            params,
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
        })
    }

    #[inline]
    pub fn params(&self) -> BallParams {
        self.params
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    /// Put the ball at rest in the center of cell `(0, 0)`.
    pub fn reset(&mut self, maze: &Maze) {
        self.position = Vector2::new(maze.cell_width() * 0.5, maze.cell_height() * 0.5);
        self.velocity = Vector2::zeros();
    }

    /// Zero the velocity in place (manual flat-reference reset).
    pub fn stop(&mut self) {
        self.velocity = Vector2::zeros();
    }

    /// Advance the ball by `dt` under a planar acceleration.
    ///
    /// Semi-implicit Euler: velocity first, then position from the updated
    /// velocity. Collision is resolved against the walls of the cell the
    /// ball *currently* occupies, which can tunnel through a thin wall at
    /// speeds far beyond what hand-tilting a board produces; a swept check
    /// would change observable behavior and is intentionally not done here.
    /// The final clamp to the outer bounds is the safety net for exactly
    /// that case at the maze border.
    pub fn step(&mut self, dt: f64, acceleration: Vector2<f64>, maze: &Maze) {
        self.velocity += acceleration * dt;
        self.velocity *= self.params.friction;

        let mut next = self.position + self.velocity * dt;

        let (gx, gy) = maze.cell_of(&self.position);
        let cell = maze.cell(gx, gy);

        let left = gx as f64 * maze.cell_width();
        let right = (gx + 1) as f64 * maze.cell_width();
        let top = gy as f64 * maze.cell_height();
        let bottom = (gy + 1) as f64 * maze.cell_height();

        let r = self.params.radius;
        let bounce = self.params.restitution;

        if cell.west && next.x - r < left {
            next.x = left + r;
            self.velocity.x = -self.velocity.x * bounce;
        } else if cell.east && next.x + r > right {
            next.x = right - r;
            self.velocity.x = -self.velocity.x * bounce;
        }

        if cell.north && next.y - r < top {
            next.y = top + r;
            self.velocity.y = -self.velocity.y * bounce;
        } else if cell.south && next.y + r > bottom {
            next.y = bottom - r;
            self.velocity.y = -self.velocity.y * bounce;
        }

        let max_x = maze.extent().x - r;
        let max_y = maze.extent().y - r;
        if next.x < r {
            next.x = r;
        }
        if next.y < r {
            next.y = r;
        }
        if next.x > max_x {
            next.x = max_x;
        }
        if next.y > max_y {
            next.y = max_y;
        }

        self.position = next;
    }
}
