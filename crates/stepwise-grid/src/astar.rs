//! A* search with a Manhattan-distance heuristic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{CellId, Grid};

/// Run A* from `start` towards `end`, returning cells in the order they
/// were closed.
///
/// Open-set priority is `(f, h, CellId)`: lowest f first, then the cell
/// closer to the goal, then row-major order. Manhattan distance is
/// admissible and consistent on a unit-cost 4-connected grid, so the first
/// time the end is extracted its `previous` chain is optimal. Unlike
/// [`dijkstra`](crate::dijkstra), the end cell is appended to the log.
pub fn a_star(grid: &mut Grid, start: CellId, end: CellId) -> Vec<CellId> {
    let mut visited_in_order = Vec::new();
    let mut open = BinaryHeap::new();
    let mut in_open = vec![false; grid.len()];

    let h = grid.manhattan(start, end);
    {
        let cell = grid.cell_mut(start);
        cell.g_score = Some(0);
        cell.h_score = Some(h);
        cell.f_score = Some(h);
    }
    open.push(Reverse((h, h, start)));
    in_open[start.0] = true;

    while let Some(Reverse((f, _, id))) = open.pop() {
        let cell = grid.cell(id);
        // Closed already, or a stale entry for a cell whose score improved.
        if cell.is_visited || cell.f_score != Some(f) {
            continue;
        }
        if cell.is_wall {
            continue;
        }
        in_open[id.0] = false;

        if id == end {
            visited_in_order.push(id);
            return visited_in_order;
        }

        let g = cell.g_score.unwrap_or(0);
        grid.cell_mut(id).is_visited = true;
        visited_in_order.push(id);

        let tentative = g + 1;
        for neighbor in grid.neighbors(id) {
            let h = grid.manhattan(neighbor, end);
            let cell = grid.cell_mut(neighbor);
            if cell.is_wall || cell.is_visited {
                continue;
            }

            if !in_open[neighbor.0] {
                in_open[neighbor.0] = true;
            } else if cell.g_score.map_or(false, |g| tentative >= g) {
                continue;
            }

            cell.previous = Some(id);
            cell.g_score = Some(tentative);
            cell.h_score = Some(h);
            cell.f_score = Some(tentative + h);
            open.push(Reverse((tentative + h, h, neighbor)));
        }
    }

    visited_in_order
}
