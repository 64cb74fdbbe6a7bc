//! Rectangular grid of cells separated by walls
//!
//! The grid is pure structural bookkeeping: which cells exist, which walls
//! sit between grid-adjacent cells, and which of those walls are open.
//! Generation and search live elsewhere and only go through the accessors
//! defined here.

use std::fmt;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::MazeError;

/// Location in the grid
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable index of a wall within its grid
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Wall between two grid-adjacent cells
#[derive(Clone, Debug)]
struct Wall {
    a: Cell,
    b: Cell,
    open: bool,
}

/// Grid of `rows * cols` cells and the walls between them.
///
/// The set of walls depends only on the dimensions: one wall for each pair
/// of cells sharing a side. Walls start closed; the only mutation is
/// opening them (and [Grid::reset], which closes all of them again).
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    walls: Vec<Wall>,
    /// Incident walls per cell index
    incident: Vec<Vec<EdgeId>>,
    /// Generation-time flag per cell index
    connected: Vec<bool>,
}

impl Grid {
    /// Build a grid with every wall closed.
    ///
    /// Returns [MazeError::InvalidDimension] if either dimension is zero, or
    /// if the grid is too large to be stored.
    ///
    /// # Examples
    /// ```
    /// use prim_maze::{Cell, Grid};
    ///
    /// let grid = Grid::build(2, 3).unwrap();
    /// assert_eq!(grid.cell_count(), 6);
    /// assert_eq!(grid.edge_count(), 7);
    /// assert_eq!(grid.edges_of(Cell::new(0, 0)).len(), 2);
    /// ```
    pub fn build(rows: usize, cols: usize) -> Result<Self, MazeError> {
        let invalid = || MazeError::InvalidDimension { rows, cols };
        if rows == 0 || cols == 0 {
            return Err(invalid());
        }
        let cell_count = rows.checked_mul(cols).ok_or_else(invalid)?;
        let wall_count = rows
            .checked_mul(cols - 1)
            .zip(cols.checked_mul(rows - 1))
            .and_then(|(horizontal, vertical)| horizontal.checked_add(vertical))
            .ok_or_else(invalid)?;

        let mut walls = Vec::new();
        walls.try_reserve_exact(wall_count).map_err(|_| invalid())?;
        let mut incident: Vec<Vec<EdgeId>> = Vec::new();
        incident.try_reserve_exact(cell_count).map_err(|_| invalid())?;
        incident.extend((0..cell_count).map(|_| Vec::with_capacity(4)));

        for row in 0..rows {
            for col in 0..cols {
                let here = Cell::new(row, col);
                // Only towards right and down, every pair is visited once
                for (dy, dx) in [(0, 1), (1, 0)] {
                    let (y1, x1) = (row + dy, col + dx);
                    if y1 >= rows || x1 >= cols {
                        continue;
                    }
                    let there = Cell::new(y1, x1);
                    let id = EdgeId(walls.len());
                    walls.push(Wall {
                        a: here,
                        b: there,
                        open: false,
                    });
                    incident[row * cols + col].push(id);
                    incident[y1 * cols + x1].push(id);
                }
            }
        }

        Ok(Grid {
            rows,
            cols,
            walls,
            incident,
            connected: vec![false; cell_count],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Total number of walls, open or not
    pub fn edge_count(&self) -> usize {
        self.walls.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Flat index `row * cols + col`
    ///
    /// Caller must make sure the cell is in the grid.
    pub fn index_of(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn cell_of(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    /// Cell at signed coordinates, `None` outside the grid
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        let cell = Cell::new(row, col);
        self.contains(cell).then_some(cell)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).map(move |i| self.cell_of(i))
    }

    /// All wall ids in construction order
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.walls.len()).map(EdgeId)
    }

    /// Walls touching `cell`; empty for cells outside the grid
    pub fn edges_of(&self, cell: Cell) -> &[EdgeId] {
        if !self.contains(cell) {
            return &[];
        }
        &self.incident[self.index_of(cell)]
    }

    /// The two cells a wall separates
    pub fn endpoints(&self, edge: EdgeId) -> (Cell, Cell) {
        let wall = &self.walls[edge.0];
        (wall.a, wall.b)
    }

    /// The cell on the other side of `edge`, if `cell` is one of its ends
    pub fn other_end(&self, edge: EdgeId, cell: Cell) -> Option<Cell> {
        let (a, b) = self.endpoints(edge);
        if cell == a {
            Some(b)
        } else if cell == b {
            Some(a)
        } else {
            None
        }
    }

    /// Wall between two cells, `None` unless they are grid-adjacent
    pub fn edge_between(&self, a: Cell, b: Cell) -> Option<EdgeId> {
        self.edges_of(a)
            .iter()
            .copied()
            .find(|&e| self.other_end(e, a) == Some(b))
    }

    pub fn open(&mut self, edge: EdgeId) {
        self.walls[edge.0].open = true;
    }

    pub fn is_open(&self, edge: EdgeId) -> bool {
        self.walls[edge.0].open
    }

    pub fn open_edge_count(&self) -> usize {
        self.walls.iter().filter(|w| w.open).count()
    }

    /// Open walls in construction order
    pub fn open_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().filter(move |&e| self.is_open(e))
    }

    /// Cells reachable from `cell` through a single open wall
    pub fn open_neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.edges_of(cell)
            .iter()
            .filter(move |&&e| self.is_open(e))
            .filter_map(move |&e| self.other_end(e, cell))
    }

    /// Whether `cell` has joined the maze; `false` for cells outside the grid
    pub fn is_connected(&self, cell: Cell) -> bool {
        self.contains(cell) && self.connected[self.index_of(cell)]
    }

    pub(crate) fn set_connected(&mut self, cell: Cell) {
        let idx = self.index_of(cell);
        self.connected[idx] = true;
    }

    /// Close every wall and clear every `connected` flag
    pub fn reset(&mut self) {
        self.walls.iter_mut().for_each(|w| w.open = false);
        self.connected.iter_mut().for_each(|c| *c = false);
    }

    /// Open-wall subgraph as an undirected graph.
    ///
    /// Node index `i` holds the cell with flat index `i`.
    pub fn open_graph(&self) -> UnGraph<Cell, ()> {
        let mut graph = UnGraph::with_capacity(self.cell_count(), self.cell_count());
        for cell in self.cells() {
            graph.add_node(cell);
        }
        for edge in self.open_edges() {
            let (a, b) = self.endpoints(edge);
            graph.add_edge(
                NodeIndex::new(self.index_of(a)),
                NodeIndex::new(self.index_of(b)),
                (),
            );
        }
        graph
    }

    /// Whether the open walls form a spanning tree, i.e. a perfect maze
    pub fn is_perfect(&self) -> bool {
        self.open_edge_count() == self.cell_count() - 1
            && connected_components(&self.open_graph()) == 1
    }
}

#[cfg(test)]
mod tests {
    use petgraph::algo::is_cyclic_undirected;

    use crate::error::MazeError;
    use crate::grid::{Cell, Grid};

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            Grid::build(0, 4).unwrap_err(),
            MazeError::InvalidDimension { rows: 0, cols: 4 }
        );
        assert!(Grid::build(3, 0).is_err());
    }

    #[test]
    fn oversized_dimension_is_rejected() {
        assert_eq!(
            Grid::build(usize::MAX, 2).unwrap_err(),
            MazeError::InvalidDimension {
                rows: usize::MAX,
                cols: 2
            }
        );
        // Cell count fits, wall count does not
        assert!(Grid::build(usize::MAX / 2, 2).is_err());
        assert!(Grid::build(2, usize::MAX / 2).is_err());
    }

    #[test]
    fn wall_count_matches_dimensions() {
        for (rows, cols) in [(1, 1), (1, 5), (4, 1), (3, 3), (5, 7)] {
            let grid = Grid::build(rows, cols).unwrap();
            assert_eq!(grid.edge_count(), rows * (cols - 1) + cols * (rows - 1));
            assert_eq!(grid.open_edge_count(), 0);
        }
    }

    #[test]
    fn incident_walls_by_position() {
        let grid = Grid::build(3, 3).unwrap();
        assert_eq!(grid.edges_of(Cell::new(0, 0)).len(), 2);
        assert_eq!(grid.edges_of(Cell::new(0, 1)).len(), 3);
        assert_eq!(grid.edges_of(Cell::new(1, 1)).len(), 4);
        assert_eq!(grid.edges_of(Cell::new(2, 2)).len(), 2);
        assert!(grid.edges_of(Cell::new(3, 0)).is_empty());
    }

    #[test]
    fn walls_only_between_adjacent_cells() {
        let grid = Grid::build(4, 5).unwrap();
        for edge in grid.edges() {
            let (a, b) = grid.endpoints(edge);
            assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1);
        }
        assert!(grid
            .edge_between(Cell::new(1, 1), Cell::new(2, 2))
            .is_none());
        assert!(grid
            .edge_between(Cell::new(1, 1), Cell::new(1, 3))
            .is_none());
        let e = grid.edge_between(Cell::new(1, 1), Cell::new(2, 1)).unwrap();
        assert_eq!(
            grid.edge_between(Cell::new(2, 1), Cell::new(1, 1)),
            Some(e)
        );
    }

    #[test]
    fn cell_at_handles_signed_coordinates() {
        let grid = Grid::build(2, 3).unwrap();
        assert_eq!(grid.cell_at(1, 2), Some(Cell::new(1, 2)));
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(0, -1), None);
        assert_eq!(grid.cell_at(2, 0), None);
        assert_eq!(grid.cell_at(0, 3), None);
    }

    #[test]
    fn opening_walls_and_reset() {
        let mut grid = Grid::build(2, 2).unwrap();
        let a = Cell::new(0, 0);
        let e = grid.edge_between(a, Cell::new(0, 1)).unwrap();
        grid.open(e);
        grid.set_connected(a);
        assert!(grid.is_open(e));
        assert_eq!(grid.open_neighbours(a).collect::<Vec<_>>(), [Cell::new(0, 1)]);

        grid.reset();
        assert!(!grid.is_open(e));
        assert!(!grid.is_connected(a));
        assert_eq!(grid.open_neighbours(a).count(), 0);
    }

    #[test]
    fn connected_flag_outside_grid_is_false() {
        let mut grid = Grid::build(3, 3).unwrap();
        // Flat index 5 belongs to (1, 2)
        grid.set_connected(Cell::new(1, 2));
        assert!(grid.is_connected(Cell::new(1, 2)));
        assert!(!grid.is_connected(Cell::new(0, 5)));
        assert!(!grid.is_connected(Cell::new(3, 0)));
    }

    #[test]
    fn perfect_maze_detection() {
        let mut grid = Grid::build(2, 2).unwrap();
        assert!(!grid.is_perfect());

        let walls = [
            (Cell::new(0, 0), Cell::new(0, 1)),
            (Cell::new(0, 1), Cell::new(1, 1)),
            (Cell::new(1, 1), Cell::new(1, 0)),
        ];
        for (a, b) in walls {
            let e = grid.edge_between(a, b).unwrap();
            grid.open(e);
        }
        assert!(grid.is_perfect());
        assert!(!is_cyclic_undirected(&grid.open_graph()));

        // Closing the loop makes it imperfect
        let e = grid.edge_between(Cell::new(1, 0), Cell::new(0, 0)).unwrap();
        grid.open(e);
        assert!(!grid.is_perfect());
        assert!(is_cyclic_undirected(&grid.open_graph()));
    }

    #[test]
    fn single_cell_grid_is_trivially_perfect() {
        let grid = Grid::build(1, 1).unwrap();
        assert_eq!(grid.edge_count(), 0);
        assert!(grid.is_perfect());
    }
}
