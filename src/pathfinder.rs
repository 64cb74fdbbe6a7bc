//! A* path search through the open walls of a maze
//!
//! Costs use an integer scale of 10 per orthogonal step. The heuristic is
//! the straight-line distance on the same scale, rounded to the nearest
//! integer.

use log::{debug, trace};

use crate::error::MazeError;
use crate::grid::{Cell, Grid};
use crate::{ExecutionMode, RunState};

/// Cost of an orthogonal step
pub const STRAIGHT_COST: u32 = 10;
/// Cost of a diagonal step; never taken on a 4-connected grid
pub const DIAGONAL_COST: u32 = 14;

/// A* cost record of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    /// Path cost from the entrance
    pub g: u32,
    /// Estimated cost to the exit
    pub h: u32,
    /// `g + h`
    pub f: u32,
}

/// Straight-line estimate from `cell` to `exit`
pub fn heuristic(cell: Cell, exit: Cell) -> u32 {
    let dx = STRAIGHT_COST as f64 * (exit.col as f64 - cell.col as f64);
    let dy = STRAIGHT_COST as f64 * (exit.row as f64 - cell.row as f64);
    (dx * dx + dy * dy).sqrt().round() as u32
}

/// Cost of moving between two neighbouring cells
pub fn step_cost(from: Cell, to: Cell) -> u32 {
    if from.row == to.row || from.col == to.col {
        STRAIGHT_COST
    } else {
        DIAGONAL_COST
    }
}

/// Per-cell search state, built from the open walls only
#[derive(Debug, Clone)]
struct SearchNode {
    cell: Cell,
    /// Indices of cells behind open walls
    neighbours: Vec<usize>,
    prev: Option<usize>,
    cost: Option<Cost>,
}

/// One path query on a finished maze.
///
/// The query owns all of its search state and only reads the grid, so
/// several queries can run against the same maze.
pub struct PathSearch<'a> {
    grid: &'a Grid,
    nodes: Vec<SearchNode>,
    /// Open set in insertion order
    open: Vec<usize>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
    entrance: usize,
    exit: usize,
    /// Node picked by the latest step
    best: Option<usize>,
    state: RunState,
    steps: usize,
    path: Option<Vec<Cell>>,
}

/// Shortest route from `entrance` to `exit`, both included
///
/// # Examples
/// ```
/// use prim_maze::{find_path, Cell, MazeGenerator};
///
/// let grid = MazeGenerator::new(Some(0)).generate(2, 1).unwrap();
/// let path = find_path(&grid, Cell::new(0, 0), Cell::new(1, 0)).unwrap();
/// assert_eq!(path, [Cell::new(0, 0), Cell::new(1, 0)]);
/// ```
pub fn find_path(grid: &Grid, entrance: Cell, exit: Cell) -> Result<Vec<Cell>, MazeError> {
    PathSearch::start(grid, entrance, exit, ExecutionMode::RunToCompletion)?.finish()
}

impl<'a> PathSearch<'a> {
    /// Prepare a search and, in [ExecutionMode::RunToCompletion], run it.
    ///
    /// Returns [MazeError::OutOfBounds] if either end is not in the grid.
    pub fn start(
        grid: &'a Grid,
        entrance: Cell,
        exit: Cell,
        mode: ExecutionMode,
    ) -> Result<Self, MazeError> {
        for cell in [entrance, exit] {
            if !grid.contains(cell) {
                return Err(MazeError::OutOfBounds(cell));
            }
        }

        let nodes = grid
            .cells()
            .map(|cell| SearchNode {
                cell,
                neighbours: grid.open_neighbours(cell).map(|n| grid.index_of(n)).collect(),
                prev: None,
                cost: None,
            })
            .collect();

        let cell_count = grid.cell_count();
        let mut search = PathSearch {
            grid,
            nodes,
            open: Vec::new(),
            in_open: vec![false; cell_count],
            closed: vec![false; cell_count],
            entrance: grid.index_of(entrance),
            exit: grid.index_of(exit),
            best: None,
            state: RunState::Idle,
            steps: 0,
            path: None,
        };
        search.begin();
        if mode == ExecutionMode::RunToCompletion {
            search.run_to_completion();
        }
        Ok(search)
    }

    /// Drop all search state and go back to [RunState::Idle].
    ///
    /// The next [PathSearch::step] starts the same query from scratch.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.prev = None;
            node.cost = None;
        }
        self.open.clear();
        self.in_open.fill(false);
        self.closed.fill(false);
        self.best = None;
        self.steps = 0;
        self.path = None;
        self.state = RunState::Idle;
    }

    /// Close the entrance and queue its neighbours.
    ///
    /// The entrance is closed before the first step rather than left
    /// reachable, so it is never queued again from a neighbour and
    /// [PathSearch::closed_set] already holds it while running. The path
    /// found is the same either way.
    fn begin(&mut self) {
        self.reset();
        let entrance = self.nodes[self.entrance].cell;
        let exit = self.nodes[self.exit].cell;
        let h = heuristic(entrance, exit);
        self.nodes[self.entrance].cost = Some(Cost { g: 0, h, f: h });
        self.closed[self.entrance] = true;
        self.state = RunState::Running;

        if self.entrance == self.exit {
            self.complete();
        } else {
            self.expand(self.entrance);
        }
    }

    /// Extract the open node with the lowest `F` and expand it.
    ///
    /// Ties go to the node that entered the open set first.
    pub fn step(&mut self) -> RunState {
        match self.state {
            RunState::Idle => {
                self.begin();
                return self.state;
            }
            RunState::Completed | RunState::Failed => return self.state,
            RunState::Running | RunState::Stepped => (),
        }

        let Some(current) = self.pop_min_f() else {
            debug!(
                "no path from {} to {} after {} steps",
                self.nodes[self.entrance].cell, self.nodes[self.exit].cell, self.steps
            );
            self.state = RunState::Failed;
            return self.state;
        };

        self.closed[current] = true;
        self.best = Some(current);
        self.steps += 1;
        trace!(
            "step {}: {} closed, {} open",
            self.steps,
            self.nodes[current].cell,
            self.open.len()
        );

        if current == self.exit {
            self.complete();
        } else {
            self.expand(current);
            self.state = RunState::Stepped;
        }
        self.state
    }

    pub fn run_to_completion(&mut self) -> RunState {
        while !self.state.is_finished() {
            self.step();
        }
        self.state
    }

    /// Run to the end and hand out the path
    pub fn finish(mut self) -> Result<Vec<Cell>, MazeError> {
        self.run_to_completion();
        self.path.take().ok_or(MazeError::NotFound {
            entrance: self.nodes[self.entrance].cell,
            exit: self.nodes[self.exit].cell,
        })
    }

    fn pop_min_f(&mut self) -> Option<usize> {
        let (pos, _) = self
            .open
            .iter()
            .enumerate()
            .min_by_key(|(_, &idx)| self.nodes[idx].cost.map_or(u32::MAX, |c| c.f))?;
        let idx = self.open.remove(pos);
        self.in_open[idx] = false;
        Some(idx)
    }

    /// Push or improve the neighbours of `idx` in the open set
    fn expand(&mut self, idx: usize) {
        let from = self.nodes[idx].cell;
        let from_g = self.nodes[idx].cost.map_or(0, |c| c.g);
        let exit = self.nodes[self.exit].cell;

        for k in 0..self.nodes[idx].neighbours.len() {
            let next = self.nodes[idx].neighbours[k];
            if self.closed[next] {
                continue;
            }
            let cell = self.nodes[next].cell;
            let g = from_g + step_cost(from, cell);
            if self.in_open[next] && self.nodes[next].cost.is_some_and(|c| c.g <= g) {
                continue;
            }

            let h = heuristic(cell, exit);
            let node = &mut self.nodes[next];
            node.cost = Some(Cost { g, h, f: g + h });
            node.prev = Some(idx);
            if !self.in_open[next] {
                self.in_open[next] = true;
                self.open.push(next);
            }
        }
    }

    fn complete(&mut self) {
        let mut path = vec![self.nodes[self.exit].cell];
        let mut current = self.exit;
        // The entrance is closed before anything else, so it has no predecessor
        while let Some(prev) = self.nodes[current].prev {
            path.push(self.nodes[prev].cell);
            current = prev;
        }
        path.reverse();

        debug!(
            "path {} -> {} of length {} found in {} steps",
            self.nodes[self.entrance].cell,
            self.nodes[self.exit].cell,
            path.len() - 1,
            self.steps
        );
        self.path = Some(path);
        self.state = RunState::Completed;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of nodes extracted from the open set so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Open set members in scan order
    pub fn open_set(&self) -> impl Iterator<Item = Cell> + '_ {
        self.open.iter().map(|&idx| self.nodes[idx].cell)
    }

    /// Closed cells in row-major order.
    ///
    /// Empty only while [RunState::Idle]; once running it holds the
    /// entrance.
    pub fn closed_set(&self) -> impl Iterator<Item = Cell> + '_ {
        self.nodes
            .iter()
            .zip(&self.closed)
            .filter(|(_, &closed)| closed)
            .map(|(node, _)| node.cell)
    }

    /// Cell extracted by the most recent step
    pub fn best_node(&self) -> Option<Cell> {
        self.best.map(|idx| self.nodes[idx].cell)
    }

    /// Cost record of a discovered cell
    pub fn cost_of(&self, cell: Cell) -> Option<Cost> {
        if !self.grid.contains(cell) {
            return None;
        }
        self.nodes[self.grid.index_of(cell)].cost
    }

    /// Found path, entrance first; `None` until completed
    pub fn path(&self) -> Option<&[Cell]> {
        self.path.as_deref()
    }
}
