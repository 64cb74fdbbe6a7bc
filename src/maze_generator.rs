//! Maze generation with randomized Prim's algorithm

use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::MazeError;
use crate::grid::{Cell, EdgeId, Grid};
use crate::{ExecutionMode, RunState};

/// Perfect maze generator.
///
/// Owns the random source, so that a seeded generator carves the same maze
/// every time for the same grid size.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Build a fresh grid and carve a maze into it
    ///
    /// # Examples
    /// ```
    /// use prim_maze::MazeGenerator;
    ///
    /// let grid = MazeGenerator::new(Some(7)).generate(8, 5).unwrap();
    /// assert_eq!(grid.open_edge_count(), 8 * 5 - 1);
    /// assert!(grid.is_perfect());
    /// ```
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid, MazeError> {
        let mut grid = Grid::build(rows, cols)?;
        self.run(&mut grid, ExecutionMode::RunToCompletion);
        Ok(grid)
    }

    /// Start generating on `grid`.
    ///
    /// All walls of the grid are closed and all cells disconnected before
    /// anything else happens, so leftovers of an earlier run never leak in.
    /// With [ExecutionMode::RunToCompletion] the returned handle is already
    /// [RunState::Completed]; otherwise it is [RunState::Running] and the
    /// caller drives it with [Generation::step].
    pub fn run<'a>(&'a mut self, grid: &'a mut Grid, mode: ExecutionMode) -> Generation<'a> {
        let mut generation = Generation {
            random: &mut self.random,
            grid,
            frontier: Vec::new(),
            state: RunState::Idle,
            steps: 0,
        };
        generation.start();
        if mode == ExecutionMode::RunToCompletion {
            generation.run_to_completion();
        }
        generation
    }

    /// Random entrance on the first column and exit on the last column
    pub fn pick_entrance_and_exit(&mut self, grid: &Grid) -> (Cell, Cell) {
        let entrance = Cell::new(self.random.gen_range(0..grid.rows()), 0);
        let exit = Cell::new(self.random.gen_range(0..grid.rows()), grid.cols() - 1);
        (entrance, exit)
    }
}

/// In-progress maze generation
///
/// The frontier is a multiset of walls with at least one connected end.
/// Walls enter it closed. A wall may be present more than once, and a wall
/// opened by a step stays in it as well; such entries are dropped only when
/// picked again with both ends already connected.
pub struct Generation<'a> {
    random: &'a mut StdRng,
    grid: &'a mut Grid,
    frontier: Vec<EdgeId>,
    state: RunState,
    steps: usize,
}

impl<'a> Generation<'a> {
    /// Close all walls and go back to [RunState::Idle].
    ///
    /// The next [Generation::step] starts a new maze on the same grid.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.frontier.clear();
        self.steps = 0;
        self.state = RunState::Idle;
    }

    fn start(&mut self) {
        self.reset();

        let first = self
            .grid
            .cell_of(self.random.gen_range(0..self.grid.cell_count()));
        self.connect(first);
        self.state = RunState::Running;
        trace!("generation starts from {first}");
    }

    /// Process one random frontier wall.
    ///
    /// Returns the state after the step. Calling this on a finished
    /// generation does nothing.
    pub fn step(&mut self) -> RunState {
        match self.state {
            RunState::Idle => {
                self.start();
                return self.state;
            }
            RunState::Completed | RunState::Failed => return self.state,
            RunState::Running | RunState::Stepped => (),
        }

        if !self.frontier.is_empty() {
            let idx = self.random.gen_range(0..self.frontier.len());
            let edge = self.frontier[idx];
            let (a, b) = self.grid.endpoints(edge);
            let a_connected = self.grid.is_connected(a);
            let b_connected = self.grid.is_connected(b);

            if a_connected && b_connected {
                // Opening would close a loop
                self.frontier.swap_remove(idx);
            } else {
                self.grid.open(edge);
                self.connect(if a_connected { b } else { a });
            }
            self.steps += 1;
            trace!(
                "step {}: wall {a}-{b}, frontier {}",
                self.steps,
                self.frontier.len()
            );
        }

        self.state = if self.frontier.is_empty() {
            debug!(
                "maze {}x{} generated in {} steps, {} walls open",
                self.grid.rows(),
                self.grid.cols(),
                self.steps,
                self.grid.open_edge_count()
            );
            RunState::Completed
        } else {
            RunState::Stepped
        };
        self.state
    }

    /// Step until the frontier is exhausted
    pub fn run_to_completion(&mut self) -> RunState {
        while !self.state.is_finished() {
            self.step();
        }
        self.state
    }

    /// Mark `cell` as part of the tree and queue its closed walls
    fn connect(&mut self, cell: Cell) {
        self.grid.set_connected(cell);
        let grid = &*self.grid;
        self.frontier.extend(
            grid.edges_of(cell)
                .iter()
                .copied()
                .filter(|&e| !grid.is_open(e)),
        );
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of frontier walls processed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn frontier(&self) -> &[EdgeId] {
        &self.frontier
    }

    /// The partially (or fully) carved grid
    pub fn grid(&self) -> &Grid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use petgraph::algo::{all_simple_paths, connected_components, is_cyclic_undirected};
    use petgraph::graph::NodeIndex;
    use proptest::prelude::*;

    use crate::grid::{Cell, Grid};
    use crate::maze_generator::MazeGenerator;
    use crate::{ExecutionMode, RunState};

    fn open_walls(grid: &Grid) -> Vec<(Cell, Cell)> {
        grid.open_edges().map(|e| grid.endpoints(e)).collect()
    }

    #[test]
    fn single_cell_opens_nothing() {
        let grid = MazeGenerator::new(Some(0)).generate(1, 1).unwrap();
        assert_eq!(grid.open_edge_count(), 0);
        assert!(grid.is_perfect());
    }

    #[test]
    fn two_cells_are_joined() {
        let grid = MazeGenerator::new(Some(0)).generate(2, 1).unwrap();
        assert_eq!(open_walls(&grid), [(Cell::new(0, 0), Cell::new(1, 0))]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = MazeGenerator::new(Some(42)).generate(4, 4).unwrap();
        for _ in 0..5 {
            let again = MazeGenerator::new(Some(42)).generate(4, 4).unwrap();
            assert_eq!(open_walls(&first), open_walls(&again));
        }
    }

    #[test]
    fn zero_dimension_is_an_error() {
        assert!(MazeGenerator::new(None).generate(0, 3).is_err());
    }

    #[test]
    fn exactly_one_simple_path_between_cells() {
        let grid = MazeGenerator::new(Some(3)).generate(3, 3).unwrap();
        let graph = grid.open_graph();
        for (a, b) in (0..grid.cell_count()).tuple_combinations() {
            let paths = all_simple_paths::<Vec<_>, _>(
                &graph,
                NodeIndex::new(a),
                NodeIndex::new(b),
                0,
                None,
            );
            assert_eq!(paths.count(), 1, "cells {a} and {b}");
        }
    }

    #[test]
    fn regeneration_starts_from_closed_grid() {
        let mut grid = Grid::build(5, 6).unwrap();
        // Walls opened by hand must not survive
        for edge in grid.edges().collect_vec() {
            grid.open(edge);
        }
        let mut gen = MazeGenerator::new(Some(1));
        gen.run(&mut grid, ExecutionMode::RunToCompletion);
        assert!(grid.is_perfect());

        let previous = open_walls(&grid);
        let mut gen = MazeGenerator::new(Some(2));
        gen.run(&mut grid, ExecutionMode::RunToCompletion);
        assert!(grid.is_perfect());
        assert_ne!(previous, open_walls(&grid));
    }

    #[test]
    fn incremental_matches_run_to_completion() {
        let expected = MazeGenerator::new(Some(9)).generate(6, 4).unwrap();

        let mut grid = Grid::build(6, 4).unwrap();
        let mut gen = MazeGenerator::new(Some(9));
        let mut generation = gen.run(&mut grid, ExecutionMode::Incremental);
        assert_eq!(generation.state(), RunState::Running);
        assert_eq!(generation.grid().open_edge_count(), 0);

        let mut states = vec![];
        while !generation.state().is_finished() {
            states.push(generation.step());
        }
        assert_eq!(states.last(), Some(&RunState::Completed));
        assert!(states[..states.len() - 1]
            .iter()
            .all(|s| *s == RunState::Stepped));
        assert_eq!(generation.steps(), states.len());
        assert!(generation.frontier().is_empty());

        // Further steps are no-ops
        assert_eq!(generation.step(), RunState::Completed);
        assert_eq!(open_walls(&grid), open_walls(&expected));
    }

    #[test]
    fn opened_walls_stay_in_frontier_until_discarded() {
        let mut grid = Grid::build(5, 5).unwrap();
        let mut gen = MazeGenerator::new(Some(8));
        let mut generation = gen.run(&mut grid, ExecutionMode::Incremental);
        let mut saw_open_in_frontier = false;
        while generation.step() != RunState::Completed {
            let grid = generation.grid();
            saw_open_in_frontier |= generation.frontier().iter().any(|&e| grid.is_open(e));
        }
        assert!(saw_open_in_frontier);
        // Every opening is followed by a discard of the same wall
        assert!(generation.steps() >= 2 * 24);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut grid = Grid::build(4, 6).unwrap();
        let mut gen = MazeGenerator::new(Some(4));
        let mut generation = gen.run(&mut grid, ExecutionMode::RunToCompletion);
        assert_eq!(generation.state(), RunState::Completed);

        generation.reset();
        assert_eq!(generation.state(), RunState::Idle);
        assert_eq!(generation.steps(), 0);
        assert!(generation.frontier().is_empty());
        assert_eq!(generation.grid().open_edge_count(), 0);
        assert!(!generation.grid().cells().any(|c| generation.grid().is_connected(c)));

        assert_eq!(generation.step(), RunState::Running);
        assert_eq!(generation.steps(), 0);
        assert_eq!(generation.run_to_completion(), RunState::Completed);
        assert!(grid.is_perfect());
    }

    #[test]
    fn frontier_walls_touch_the_tree() {
        let mut grid = Grid::build(7, 7).unwrap();
        let mut gen = MazeGenerator::new(Some(5));
        let mut generation = gen.run(&mut grid, ExecutionMode::Incremental);
        while generation.step() != RunState::Completed {
            let grid = generation.grid();
            for &edge in generation.frontier() {
                let (a, b) = grid.endpoints(edge);
                assert!(grid.is_connected(a) || grid.is_connected(b));
            }
        }
        assert!(generation.grid().cells().all(|c| generation.grid().is_connected(c)));
    }

    #[test]
    fn entrance_and_exit_on_outer_columns() {
        let mut gen = MazeGenerator::new(Some(11));
        let grid = gen.generate(9, 13).unwrap();
        for _ in 0..20 {
            let (entrance, exit) = gen.pick_entrance_and_exit(&grid);
            assert_eq!(entrance.col, 0);
            assert_eq!(exit.col, 12);
            assert!(grid.contains(entrance) && grid.contains(exit));
        }
    }

    proptest! {
        #[test]
        fn generated_maze_is_spanning_tree(
            rows in 1usize..12,
            cols in 1usize..12,
            seed in any::<u64>(),
        ) {
            let grid = MazeGenerator::new(Some(seed)).generate(rows, cols).unwrap();
            let graph = grid.open_graph();
            prop_assert_eq!(grid.open_edge_count(), rows * cols - 1);
            prop_assert_eq!(connected_components(&graph), 1);
            prop_assert!(!is_cyclic_undirected(&graph));
        }
    }
}
