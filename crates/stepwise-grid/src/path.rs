//! Shortest-path reconstruction from back-pointers.

use crate::grid::{CellId, Grid};

/// Follow `previous` pointers from `end` back to `start` and return the
/// chain in start-to-end order.
///
/// Returns an empty path when `end` was never reached. A chain longer than
/// the grid (only possible with corrupted pointers) is also treated as
/// unreachable.
pub fn shortest_path(grid: &Grid, start: CellId, end: CellId) -> Vec<CellId> {
    let mut path = vec![end];
    let mut current = end;

    while let Some(previous) = grid.get(current).and_then(|c| c.previous) {
        if path.len() > grid.len() {
            return Vec::new();
        }
        path.push(previous);
        current = previous;
    }

    if current != start {
        return Vec::new();
    }

    path.reverse();
    path
}

/// Number of moves along a path (cells minus one).
pub fn path_length(path: &[CellId]) -> usize {
    path.len().saturating_sub(1)
}
