//! Dijkstra's algorithm over a unit-cost 4-connected grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{CellId, Grid};

/// Run Dijkstra from `start` towards `end`, returning cells in the order they
/// were finalized.
///
/// The unvisited frontier is a min-heap keyed on `(distance, CellId)`, so
/// equal distances resolve in row-major order. The end cell is never
/// appended: extracting it stops the search, and its `previous` pointer was
/// already set when a neighbour relaxed it. An empty frontier means the end
/// is unreachable and the partial log is returned.
///
/// Walls are read, never written.
pub fn dijkstra(grid: &mut Grid, start: CellId, end: CellId) -> Vec<CellId> {
    let mut visited_in_order = Vec::new();
    let mut frontier = BinaryHeap::new();

    grid.cell_mut(start).distance = Some(0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((distance, id))) = frontier.pop() {
        let cell = grid.cell(id);
        // Superseded heap entry
        if cell.is_visited || cell.distance != Some(distance) {
            continue;
        }
        if cell.is_wall {
            continue;
        }
        if id == end {
            return visited_in_order;
        }

        grid.cell_mut(id).is_visited = true;
        visited_in_order.push(id);

        let next = distance + 1;
        for neighbor in grid.neighbors(id) {
            let cell = grid.cell_mut(neighbor);
            if cell.is_visited || cell.is_wall {
                continue;
            }
            if cell.distance.map_or(true, |d| next < d) {
                cell.distance = Some(next);
                cell.previous = Some(id);
                frontier.push(Reverse((next, neighbor)));
            }
        }
    }

    visited_in_order
}
