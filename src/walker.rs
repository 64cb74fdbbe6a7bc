//! Manual movement through a finished maze

use crate::error::{MazeError, MoveRejection};
use crate::grid::{Cell, Grid};

/// Unit move on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(delta_row, delta_col)` of the move
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parse `U`, `D`, `L` or `R` (either case)
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Position in a maze that only changes through open walls.
///
/// The walker does not plan anything; every move is checked on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walker {
    position: Cell,
    steps: usize,
}

impl Walker {
    /// Place a walker on `start`
    pub fn new(grid: &Grid, start: Cell) -> Result<Self, MazeError> {
        if !grid.contains(start) {
            return Err(MazeError::OutOfBounds(start));
        }
        Ok(Self {
            position: start,
            steps: 0,
        })
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Number of accepted moves
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_at(&self, cell: Cell) -> bool {
        self.position == cell
    }

    /// Move by the given offset.
    ///
    /// The target must exist and the wall between it and the current
    /// position must be open; anything else, including diagonal or longer
    /// jumps, is rejected without touching the walker.
    pub fn try_move(
        &mut self,
        grid: &Grid,
        delta_row: isize,
        delta_col: isize,
    ) -> Result<Cell, MazeError> {
        let from = self.position;
        let reject = |reason| MazeError::Rejected {
            from,
            delta_row,
            delta_col,
            reason,
        };

        let target = (from.row as isize)
            .checked_add(delta_row)
            .zip((from.col as isize).checked_add(delta_col))
            .and_then(|(row, col)| grid.cell_at(row, col))
            .ok_or_else(|| reject(MoveRejection::OutOfBounds))?;

        match grid.edge_between(from, target) {
            Some(edge) if grid.is_open(edge) => {
                self.position = target;
                self.steps += 1;
                Ok(target)
            }
            _ => Err(reject(MoveRejection::ClosedWall)),
        }
    }

    pub fn step(&mut self, grid: &Grid, direction: Direction) -> Result<Cell, MazeError> {
        let (dr, dc) = direction.delta();
        self.try_move(grid, dr, dc)
    }
}
