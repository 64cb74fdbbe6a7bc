//! Generate perfect mazes, find the way through them, and walk them
//!
//! A [Grid] of cells is carved into a perfect maze (a spanning tree of the
//! grid graph) by [MazeGenerator], using randomized Prim's algorithm. The
//! finished maze is read by [find_path], an A* search, and by [Walker],
//! which moves one cell at a time through open walls only.
//!
//! # Examples
//! ```
//! use prim_maze::{find_path, Cell, MazeGenerator, Walker};
//!
//! let mut generator = MazeGenerator::new(Some(2024));
//! let grid = generator.generate(16, 16).unwrap();
//! assert!(grid.is_perfect());
//!
//! let (entrance, exit) = generator.pick_entrance_and_exit(&grid);
//! let path = find_path(&grid, entrance, exit).unwrap();
//! assert_eq!(path.first(), Some(&entrance));
//! assert_eq!(path.last(), Some(&exit));
//!
//! // Following the path with the walker always succeeds
//! let mut walker = Walker::new(&grid, entrance).unwrap();
//! for next in &path[1..] {
//!     let dr = next.row as isize - walker.position().row as isize;
//!     let dc = next.col as isize - walker.position().col as isize;
//!     walker.try_move(&grid, dr, dc).unwrap();
//! }
//! assert!(walker.is_at(exit));
//! assert_eq!(walker.steps(), path.len() - 1);
//! ```
//!
//! Both algorithms can also be driven one step at a time, which is what a
//! visualization would do between frames:
//! ```
//! use prim_maze::{Cell, ExecutionMode, Grid, MazeGenerator, PathSearch, RunState};
//!
//! let mut grid = Grid::build(5, 5).unwrap();
//! let mut generator = MazeGenerator::new(Some(1));
//! let mut generation = generator.run(&mut grid, ExecutionMode::Incremental);
//! while generation.step() != RunState::Completed {
//!     let _remaining = generation.frontier().len();
//! }
//!
//! let mut search = PathSearch::start(&grid, Cell::new(0, 0), Cell::new(4, 4), ExecutionMode::Incremental).unwrap();
//! while !search.step().is_finished() {
//!     let _best = search.best_node();
//! }
//! assert_eq!(search.state(), RunState::Completed);
//! ```

pub mod error;
pub mod grid;
pub mod maze_generator;
pub mod pathfinder;
pub mod walker;

pub use error::{MazeError, MoveRejection};
pub use grid::{Cell, EdgeId, Grid};
pub use maze_generator::{Generation, MazeGenerator};
pub use pathfinder::{find_path, Cost, PathSearch};
pub use walker::{Direction, Walker};

/// Life cycle shared by generation and path search
///
/// `Idle -> Running -> {Completed, Failed}`; while driven step by step the
/// state is `Stepped` between `Running` and the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stepped,
    Completed,
    Failed,
}

impl RunState {
    pub fn is_finished(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// How an algorithm is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Run synchronously until finished
    #[default]
    RunToCompletion,
    /// Do one unit of work per `step()` call
    Incremental,
}

impl ExecutionMode {
    /// Map a "show steps" switch to a mode
    pub fn from_step_flag(step: bool) -> Self {
        if step {
            ExecutionMode::Incremental
        } else {
            ExecutionMode::RunToCompletion
        }
    }
}
