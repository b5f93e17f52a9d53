//! Flat-arena grid of cells.
//!
//! Cells live in one row-major `Vec`. Back-pointers between cells are
//! [`CellId`] indices into that arena, so cloning a grid never aliases the
//! original.

use crate::{GridError, Result};

/// Index of a cell in its grid's row-major arena.
///
/// Ordering follows row-major position, which is also the tie-break order
/// used by the search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub usize);

impl CellId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One grid square.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_start: bool,
    pub is_end: bool,
    pub is_wall: bool,
    pub is_visited: bool,
    pub is_path: bool,
    /// Best known distance from the start. `None` means not yet reached.
    pub distance: Option<u32>,
    /// Predecessor on the best known path from the start.
    pub previous: Option<CellId>,
    /// A*: cost from the start.
    pub g_score: Option<u32>,
    /// A*: heuristic estimate to the end.
    pub h_score: Option<u32>,
    /// A*: `g_score + h_score`.
    pub f_score: Option<u32>,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            is_start: false,
            is_end: false,
            is_wall: false,
            is_visited: false,
            is_path: false,
            distance: None,
            previous: None,
            g_score: None,
            h_score: None,
            f_score: None,
        }
    }

    /// Reset everything a search or playback writes. Walls, start and end
    /// are left alone.
    pub fn clear_run(&mut self) {
        self.is_visited = false;
        self.is_path = false;
        self.distance = None;
        self.previous = None;
        self.g_score = None;
        self.h_score = None;
        self.f_score = None;
    }

    /// Copy distance, back-pointer and A* scores from `other`.
    pub fn copy_scores(&mut self, other: &Cell) {
        self.distance = other.distance;
        self.previous = other.previous;
        self.g_score = other.g_score;
        self.h_score = other.h_score;
        self.f_score = other.f_score;
    }

    /// Start or end marker.
    pub fn is_endpoint(&self) -> bool {
        self.is_start || self.is_end
    }
}

/// Rectangular grid with exactly one start and one end cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: CellId,
    end: CellId,
}

impl Grid {
    pub const DEFAULT_ROWS: usize = 15;
    pub const DEFAULT_COLS: usize = 25;
    pub const DEFAULT_START: (usize, usize) = (7, 5);
    pub const DEFAULT_END: (usize, usize) = (7, 20);

    /// Build an empty grid with the given start and end positions.
    pub fn new(rows: usize, cols: usize, start: (usize, usize), end: (usize, usize)) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        for (row, col) in [start, end] {
            if row >= rows || col >= cols {
                return Err(GridError::OutOfBounds { row, col, rows, cols });
            }
        }
        if start == end {
            return Err(GridError::Overlap {
                row: start.0,
                col: start.1,
            });
        }

        Ok(Self::build(rows, cols, start, end))
    }

    /// Build a grid of the given size with start and end placed the way the
    /// default 15×25 layout places them: middle row, a fifth of the way in
    /// from each side.
    pub fn with_size(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols < 2 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let row = rows / 2;
        let start_col = cols / 5;
        let end_col = (cols - cols / 5).min(cols - 1).max(start_col + 1);
        Self::new(rows, cols, (row, start_col), (row, end_col))
    }

    fn build(rows: usize, cols: usize, start: (usize, usize), end: (usize, usize)) -> Self {
        let mut cells: Vec<Cell> = (0..rows * cols)
            .map(|i| Cell::new(i / cols, i % cols))
            .collect();
        let start = CellId(start.0 * cols + start.1);
        let end = CellId(end.0 * cols + end.1);
        cells[start.0].is_start = true;
        cells[end.0].is_end = true;

        Self {
            rows,
            cols,
            cells,
            start,
            end,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Id of the cell at `(row, col)`, if it exists.
    pub fn id(&self, row: usize, col: usize) -> Option<CellId> {
        (row < self.rows && col < self.cols).then(|| CellId(row * self.cols + col))
    }

    /// Like [`Grid::id`] but reports which coordinate was rejected.
    pub fn checked_id(&self, row: usize, col: usize) -> Result<CellId> {
        self.id(row, col).ok_or(GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Cell by id. Panics on an id from a different-sized grid.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Cell by id, or `None` when the id is outside this grid.
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.0)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn end(&self) -> CellId {
        self.end
    }

    /// Up, right, down, left neighbours that exist.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = CellId> {
        let (rows, cols) = (self.rows, self.cols);
        let (row, col) = (id.0 / cols, id.0 % cols);

        let up = (row > 0).then(|| CellId(id.0 - cols));
        let right = (col + 1 < cols).then(|| CellId(id.0 + 1));
        let down = (row + 1 < rows).then(|| CellId(id.0 + cols));
        let left = (col > 0).then(|| CellId(id.0 - 1));

        [up, right, down, left].into_iter().flatten()
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(&self, a: CellId, b: CellId) -> u32 {
        let (ar, ac) = (a.0 / self.cols, a.0 % self.cols);
        let (br, bc) = (b.0 / self.cols, b.0 % self.cols);
        (ar.abs_diff(br) + ac.abs_diff(bc)) as u32
    }

    /// Reset every run-scoped field on every cell.
    pub fn clear_run(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_run);
    }

    /// Set or clear a wall. Start and end cells are never walled.
    ///
    /// Returns `true` when the cell changed.
    pub fn set_wall(&mut self, id: CellId, wall: bool) -> bool {
        match self.cells.get_mut(id.0) {
            Some(cell) if !cell.is_endpoint() && cell.is_wall != wall => {
                cell.is_wall = wall;
                true
            }
            _ => false,
        }
    }

    /// Flip the wall flag. Start and end cells are never walled.
    pub fn toggle_wall(&mut self, id: CellId) -> bool {
        match self.get(id) {
            Some(cell) => {
                let wall = !cell.is_wall;
                self.set_wall(id, wall)
            }
            None => false,
        }
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        for cell in &mut self.cells {
            cell.is_wall = false;
        }
    }

    /// Number of walled cells.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall).count()
    }

    /// Move the start marker. Refused onto the end cell or a wall.
    pub fn move_start(&mut self, to: CellId) -> bool {
        if !self.can_host_endpoint(to, self.end) {
            return false;
        }
        self.cells[self.start.0].is_start = false;
        self.cells[to.0].is_start = true;
        self.start = to;
        true
    }

    /// Move the end marker. Refused onto the start cell or a wall.
    pub fn move_end(&mut self, to: CellId) -> bool {
        if !self.can_host_endpoint(to, self.start) {
            return false;
        }
        self.cells[self.end.0].is_end = false;
        self.cells[to.0].is_end = true;
        self.end = to;
        true
    }

    fn can_host_endpoint(&self, to: CellId, other: CellId) -> bool {
        matches!(self.get(to), Some(cell) if !cell.is_wall && to != other)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::build(
            Self::DEFAULT_ROWS,
            Self::DEFAULT_COLS,
            Self::DEFAULT_START,
            Self::DEFAULT_END,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let grid = Grid::default();
        assert_eq!(grid.rows(), 15);
        assert_eq!(grid.cols(), 25);
        assert_eq!(grid.len(), 375);

        let start = grid.cell(grid.start());
        assert_eq!((start.row, start.col), (7, 5));
        assert!(start.is_start);

        let end = grid.cell(grid.end());
        assert_eq!((end.row, end.col), (7, 20));
        assert!(end.is_end);
    }

    #[test]
    fn with_size_matches_default_layout() {
        assert_eq!(Grid::with_size(15, 25).unwrap(), Grid::default());
        assert!(Grid::with_size(3, 2).is_ok());
        assert!(Grid::with_size(3, 1).is_err());
    }

    #[test]
    fn new_rejects_bad_layouts() {
        assert!(matches!(
            Grid::new(0, 5, (0, 0), (0, 1)),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(3, 3, (0, 0), (3, 0)),
            Err(GridError::OutOfBounds { row: 3, .. })
        ));
        assert!(matches!(
            Grid::new(3, 3, (1, 1), (1, 1)),
            Err(GridError::Overlap { .. })
        ));
    }

    #[test]
    fn neighbors_in_up_right_down_left_order() {
        let grid = Grid::new(3, 3, (0, 0), (2, 2)).unwrap();
        let center = grid.id(1, 1).unwrap();
        let ids: Vec<_> = grid.neighbors(center).collect();
        assert_eq!(ids, vec![CellId(1), CellId(5), CellId(7), CellId(3)]);

        let corner: Vec<_> = grid.neighbors(CellId(0)).collect();
        assert_eq!(corner, vec![CellId(1), CellId(3)]);
    }

    #[test]
    fn walls_never_cover_endpoints() {
        let mut grid = Grid::default();
        let start = grid.start();
        assert!(!grid.toggle_wall(start));
        assert!(!grid.cell(start).is_wall);

        let other = grid.id(0, 0).unwrap();
        assert!(grid.toggle_wall(other));
        assert!(grid.cell(other).is_wall);
        assert!(!grid.set_wall(other, true));
        assert!(grid.toggle_wall(other));
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn moving_endpoints() {
        let mut grid = Grid::default();
        let end = grid.end();
        assert!(!grid.move_start(end));

        let wall = grid.id(0, 0).unwrap();
        grid.set_wall(wall, true);
        assert!(!grid.move_start(wall));

        let target = grid.id(2, 2).unwrap();
        let old = grid.start();
        assert!(grid.move_start(target));
        assert_eq!(grid.start(), target);
        assert!(grid.cell(target).is_start);
        assert!(!grid.cell(old).is_start);

        assert!(grid.move_end(old));
        assert!(grid.cell(old).is_end);
        assert!(!grid.cell(end).is_end);
    }

    #[test]
    fn clear_run_keeps_layout() {
        let mut grid = Grid::default();
        let id = grid.id(3, 3).unwrap();
        grid.set_wall(id, true);
        {
            let cell = grid.cell_mut(CellId(0));
            cell.is_visited = true;
            cell.distance = Some(4);
            cell.previous = Some(CellId(1));
            cell.f_score = Some(9);
        }
        grid.clear_run();
        assert_eq!(grid.cell(CellId(0)), &Cell::new(0, 0));
        assert!(grid.cell(id).is_wall);
    }

    #[test]
    fn manhattan_distance() {
        let grid = Grid::default();
        assert_eq!(grid.manhattan(grid.start(), grid.end()), 15);
    }
}
