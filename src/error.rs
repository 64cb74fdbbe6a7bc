//! Error kinds reported by the maze engine

use thiserror::Error;

use crate::grid::Cell;

/// Why the walker refused a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Target position is outside the grid
    OutOfBounds,
    /// Target is not adjacent, or the wall in between is still closed
    ClosedWall,
}

/// Errors returned by grid construction, path search and walking.
///
/// None of these are fatal; every variant is an expected outcome the caller
/// is supposed to branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Grid must have at least one row and one column, and fit in memory
    #[error("invalid grid dimension {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },

    /// A query referred to a cell that is not in the grid
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),

    /// Search ran out of open nodes before reaching the exit
    #[error("no path from {entrance} to {exit}")]
    NotFound { entrance: Cell, exit: Cell },

    /// Walker move was not allowed
    #[error("move from {from} by ({delta_row}, {delta_col}) rejected: {reason:?}")]
    Rejected {
        from: Cell,
        delta_row: isize,
        delta_col: isize,
        reason: MoveRejection,
    },
}
