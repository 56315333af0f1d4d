//! Grid maze carved with a randomized depth-first search.

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

fn default_cells_x() -> u32 {
    8
}

fn default_cells_y() -> u32 {
    6
}

/// A4 landscape, in meters.
fn default_sheet_width() -> f64 {
    0.297
}

fn default_sheet_height() -> f64 {
    0.210
}

fn default_wall_thickness() -> f64 {
    0.0035
}

/// Static maze geometry: cell counts plus the physical sheet the maze is
/// mapped onto. Fixed at generation time and never mutated afterwards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MazeSpec {
    #[serde(default = "default_cells_x")]
    pub cells_x: u32,
    #[serde(default = "default_cells_y")]
    pub cells_y: u32,
    /// Physical width of the play area, same units as the board geometry.
    #[serde(default = "default_sheet_width")]
    pub sheet_width: f64,
    #[serde(default = "default_sheet_height")]
    pub sheet_height: f64,
    /// Wall thickness, consumed by wall-mesh generation (not by collision).
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
}

impl Default for MazeSpec {
    fn default() -> Self {
        Self {
            cells_x: default_cells_x(),
            cells_y: default_cells_y(),
            sheet_width: default_sheet_width(),
            sheet_height: default_sheet_height(),
            wall_thickness: default_wall_thickness(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeSpecError {
    #[error("cell counts must be >= 1")]
    InvalidCellCount,
    #[error("sheet dimensions must be finite and > 0")]
    InvalidSheetSize,
    #[error("wall thickness must be finite and >= 0")]
    InvalidWallThickness,
}

impl MazeSpec {
    pub fn validate(&self) -> Result<(), MazeSpecError> {
        if self.cells_x == 0 || self.cells_y == 0 {
            return Err(MazeSpecError::InvalidCellCount);
        }
        if !self.sheet_width.is_finite()
            || !self.sheet_height.is_finite()
            || self.sheet_width <= 0.0
            || self.sheet_height <= 0.0
        {
            return Err(MazeSpecError::InvalidSheetSize);
        }
        if !self.wall_thickness.is_finite() || self.wall_thickness < 0.0 {
            return Err(MazeSpecError::InvalidWallThickness);
        }
        Ok(())
    }
}

/// Wall side of a cell.
///
/// The maze lives in image-style coordinates: `North` is the edge towards
/// `y = 0`, `South` towards growing `y`, `West` towards `x = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    North,
    South,
    East,
    West,
}

/// Wall flags of one cell. `true` means the wall is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Cell {
    const CLOSED: Cell = Cell {
        north: true,
        south: true,
        east: true,
        west: true,
    };

    #[inline]
    pub fn wall(&self, side: Side) -> bool {
        match side {
            Side::North => self.north,
            Side::South => self.south,
            Side::East => self.east,
            Side::West => self.west,
        }
    }
}

/// A generated maze. Immutable after generation.
///
/// By construction the open passages form a spanning tree over the grid:
/// every cell is reachable from `(0, 0)` and there are no cycles.
#[derive(Clone, Debug)]
pub struct Maze {
    spec: MazeSpec,
    cells: Vec<Cell>,
    cell_width: f64,
    cell_height: f64,
}

const DIRS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl Maze {
    /// Carve a maze with the caller's RNG.
    ///
    /// Iterative randomized DFS with an explicit stack: start at `(0, 0)`,
    /// repeatedly pick an unvisited 4-neighbor of the stack top uniformly
    /// at random, knock down the shared wall and descend; backtrack when no
    /// unvisited neighbor remains. The walk terminates with every cell
    /// visited, which is exactly the spanning-tree property.
    pub fn generate(spec: MazeSpec, rng: &mut impl Rng) -> Result<Self, MazeSpecError> {
        spec.validate()?;

        let (w, h) = (spec.cells_x as usize, spec.cells_y as usize);
        let mut cells = vec![Cell::CLOSED; w * h];
        let mut visited = vec![false; w * h];
        let mut stack = Vec::with_capacity(w * h);

        visited[0] = true;
        stack.push((0usize, 0usize));

        while let Some(&(cx, cy)) = stack.last() {
            let mut candidates = [(0usize, 0usize); 4];
            let mut count = 0;
            for (dx, dy) in DIRS {
                let nx = cx as i64 + dx;
                let ny = cy as i64 + dy;
                if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !visited[ny * w + nx] {
                    candidates[count] = (nx, ny);
                    count += 1;
                }
            }

            if count == 0 {
                stack.pop();
                continue;
            }

            let (nx, ny) = candidates[rng.gen_range(0..count)];
            if nx > cx {
                cells[cy * w + cx].east = false;
                cells[ny * w + nx].west = false;
            } else if nx < cx {
                cells[cy * w + cx].west = false;
                cells[ny * w + nx].east = false;
            } else if ny > cy {
                cells[cy * w + cx].south = false;
                cells[ny * w + nx].north = false;
            } else {
                cells[cy * w + cx].north = false;
                cells[ny * w + nx].south = false;
            }
            visited[ny * w + nx] = true;
            stack.push((nx, ny));
        }

        log::debug!("carved {}x{} maze", spec.cells_x, spec.cells_y);

        Ok(Self {
            spec,
            cells,
            cell_width: spec.sheet_width / spec.cells_x as f64,
            cell_height: spec.sheet_height / spec.cells_y as f64,
        })
    }

    /// Carve a maze from an explicit seed (deterministic).
    pub fn generate_seeded(spec: MazeSpec, seed: u64) -> Result<Self, MazeSpecError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(spec, &mut rng)
    }

    #[inline]
    pub fn spec(&self) -> MazeSpec {
        self.spec
    }

    #[inline]
    pub fn cells_x(&self) -> usize {
        self.spec.cells_x as usize
    }

    #[inline]
    pub fn cells_y(&self) -> usize {
        self.spec.cells_y as usize
    }

    #[inline]
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    #[inline]
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Physical extent of the play area.
    #[inline]
    pub fn extent(&self) -> Vector2<f64> {
        Vector2::new(self.spec.sheet_width, self.spec.sheet_height)
    }

    /// Cell at grid position `(x, y)`.
    ///
    /// Out-of-range coordinates are clamped to the border cell so a ball
    /// sitting exactly on the outer edge still resolves to a valid cell.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        let x = x.min(self.cells_x() - 1);
        let y = y.min(self.cells_y() - 1);
        &self.cells[y * self.cells_x() + x]
    }

    #[inline]
    pub fn has_wall(&self, x: usize, y: usize, side: Side) -> bool {
        self.cell(x, y).wall(side)
    }

    /// Grid cell containing a physical position (clamped to the grid).
    pub fn cell_of(&self, position: &Vector2<f64>) -> (usize, usize) {
        let gx = (position.x / self.cell_width).floor().max(0.0) as usize;
        let gy = (position.y / self.cell_height).floor().max(0.0) as usize;
        (gx.min(self.cells_x() - 1), gy.min(self.cells_y() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flood-fill over open passages from (0, 0).
    fn reachable_cells(maze: &Maze) -> usize {
        let (w, h) = (maze.cells_x(), maze.cells_y());
        let mut seen = vec![false; w * h];
        let mut queue = vec![(0usize, 0usize)];
        seen[0] = true;
        let mut count = 0;

        while let Some((x, y)) = queue.pop() {
            count += 1;
            let cell = maze.cell(x, y);
            if !cell.east && x + 1 < w && !seen[y * w + x + 1] {
                seen[y * w + x + 1] = true;
                queue.push((x + 1, y));
            }
            if !cell.west && x > 0 && !seen[y * w + x - 1] {
                seen[y * w + x - 1] = true;
                queue.push((x - 1, y));
            }
            if !cell.south && y + 1 < h && !seen[(y + 1) * w + x] {
                seen[(y + 1) * w + x] = true;
                queue.push((x, y + 1));
            }
            if !cell.north && y > 0 && !seen[(y - 1) * w + x] {
                seen[(y - 1) * w + x] = true;
                queue.push((x, y - 1));
            }
        }
        count
    }

    fn open_passages(maze: &Maze) -> usize {
        let mut open = 0;
        for y in 0..maze.cells_y() {
            for x in 0..maze.cells_x() {
                let cell = maze.cell(x, y);
                if x + 1 < maze.cells_x() && !cell.east {
                    open += 1;
                }
                if y + 1 < maze.cells_y() && !cell.south {
                    open += 1;
                }
            }
        }
        open
    }

    fn spec(cells_x: u32, cells_y: u32) -> MazeSpec {
        MazeSpec {
            cells_x,
            cells_y,
            ..MazeSpec::default()
        }
    }

    #[test]
    fn every_cell_is_reachable_for_many_seeds_and_sizes() {
        for (w, h) in [(1, 1), (1, 8), (8, 1), (2, 2), (8, 6), (13, 7)] {
            for seed in 0..8 {
                let maze = Maze::generate_seeded(spec(w, h), seed).expect("maze");
                assert_eq!(
                    reachable_cells(&maze),
                    (w * h) as usize,
                    "disconnected {w}x{h} maze for seed {seed}"
                );
            }
        }
    }

    #[test]
    fn passage_count_matches_a_spanning_tree() {
        // A tree over N nodes has exactly N - 1 edges; more would mean a
        // cycle, fewer an unreachable region.
        for seed in [0, 1, 42] {
            let maze = Maze::generate_seeded(spec(8, 6), seed).expect("maze");
            assert_eq!(open_passages(&maze), 8 * 6 - 1);
        }
    }

    #[test]
    fn neighboring_wall_flags_agree() {
        let maze = Maze::generate_seeded(spec(8, 6), 7).expect("maze");
        for y in 0..maze.cells_y() {
            for x in 0..maze.cells_x() {
                if x + 1 < maze.cells_x() {
                    assert_eq!(maze.cell(x, y).east, maze.cell(x + 1, y).west);
                }
                if y + 1 < maze.cells_y() {
                    assert_eq!(maze.cell(x, y).south, maze.cell(x, y + 1).north);
                }
            }
        }
    }

    #[test]
    fn outer_boundary_stays_closed() {
        let maze = Maze::generate_seeded(spec(8, 6), 3).expect("maze");
        for x in 0..maze.cells_x() {
            assert!(maze.has_wall(x, 0, Side::North));
            assert!(maze.has_wall(x, maze.cells_y() - 1, Side::South));
        }
        for y in 0..maze.cells_y() {
            assert!(maze.has_wall(0, y, Side::West));
            assert!(maze.has_wall(maze.cells_x() - 1, y, Side::East));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let a = Maze::generate_seeded(spec(8, 6), 99).expect("maze");
        let b = Maze::generate_seeded(spec(8, 6), 99).expect("maze");
        for y in 0..a.cells_y() {
            for x in 0..a.cells_x() {
                assert_eq!(a.cell(x, y), b.cell(x, y));
            }
        }
    }

    #[test]
    fn single_cell_maze_keeps_all_walls() {
        let maze = Maze::generate_seeded(spec(1, 1), 0).expect("maze");
        assert_eq!(*maze.cell(0, 0), Cell::CLOSED);
    }

    #[test]
    fn cell_lookup_clamps_out_of_range() {
        let maze = Maze::generate_seeded(spec(4, 3), 0).expect("maze");
        assert_eq!(maze.cell(100, 100), maze.cell(3, 2));
        let outside = Vector2::new(-1.0, 99.0);
        assert_eq!(maze.cell_of(&outside), (0, 2));
    }

    #[test]
    fn invalid_specs_are_rejected() {
        assert_eq!(
            Maze::generate_seeded(spec(0, 5), 0).unwrap_err(),
            MazeSpecError::InvalidCellCount
        );
        let bad = MazeSpec {
            sheet_width: 0.0,
            ..MazeSpec::default()
        };
        assert_eq!(
            Maze::generate_seeded(bad, 0).unwrap_err(),
            MazeSpecError::InvalidSheetSize
        );
        let bad = MazeSpec {
            wall_thickness: -1.0,
            ..MazeSpec::default()
        };
        assert_eq!(
            Maze::generate_seeded(bad, 0).unwrap_err(),
            MazeSpecError::InvalidWallThickness
        );
    }
}
