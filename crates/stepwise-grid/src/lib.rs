//! Stepwise Pathfinding Engines
//!
//! A flat-arena grid model plus instrumented Dijkstra and A* searches.
//!
//! # Search contract
//!
//! Each engine takes a grid, a start cell and an end cell, and returns the
//! cells in the order the algorithm finalized them. The shortest path is
//! reconstructed afterwards by walking `previous` back-pointers from the end
//! cell with [`shortest_path`]. Walls are never modified.
//!
//! Frontier ties are broken deterministically (see each engine), so the
//! same grid always produces the same visit order.
//!
//! # Usage
//!
//! ```
//! use stepwise_grid::{search, Grid, PathAlgorithm, path_length};
//!
//! let grid = Grid::default();
//! let run = search(&grid, PathAlgorithm::AStar);
//! assert_eq!(path_length(&run.path), 15);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod astar;
mod dijkstra;
mod grid;
mod path;

pub use astar::a_star;
pub use dijkstra::dijkstra;
pub use grid::{Cell, CellId, Grid};
pub use path::{path_length, shortest_path};

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors from building or addressing a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate outside the grid.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The grid cannot hold distinct start and end cells.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Start and end were placed on the same cell.
    #[error("start and end overlap at ({row}, {col})")]
    Overlap { row: usize, col: usize },

    /// An algorithm name that does not match any engine.
    #[error("unknown pathfinding algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Available pathfinding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PathAlgorithm {
    #[default]
    Dijkstra,
    AStar,
}

impl PathAlgorithm {
    pub const ALL: [PathAlgorithm; 2] = [PathAlgorithm::Dijkstra, PathAlgorithm::AStar];

    /// Run this engine in place on `grid`.
    pub fn run(self, grid: &mut Grid, start: CellId, end: CellId) -> Vec<CellId> {
        match self {
            PathAlgorithm::Dijkstra => dijkstra(grid, start, end),
            PathAlgorithm::AStar => a_star(grid, start, end),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::AStar => "astar",
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathAlgorithm {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(PathAlgorithm::Dijkstra),
            "astar" | "a*" | "a_star" => Ok(PathAlgorithm::AStar),
            _ => Err(GridError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Output of one search: the two logs a viewer replays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRun {
    /// Cells in the order the engine finalized them.
    pub visited: Vec<CellId>,
    /// Start-to-end shortest path, empty when the end is unreachable.
    pub path: Vec<CellId>,
    /// Working copy after the search, with distances, scores and
    /// back-pointers filled in.
    pub scored: Grid,
}

/// Run `algorithm` on a cleared copy of `grid`.
///
/// The caller's grid is not touched, so repeated calls on the same layout
/// return identical runs.
pub fn search(grid: &Grid, algorithm: PathAlgorithm) -> SearchRun {
    let mut scored = grid.clone();
    scored.clear_run();

    let (start, end) = (scored.start(), scored.end());
    let visited = algorithm.run(&mut scored, start, end);
    let path = shortest_path(&scored, start, end);

    SearchRun {
        visited,
        path,
        scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Independent BFS for reference distances.
    fn bfs_distance(grid: &Grid) -> Option<usize> {
        let mut dist = vec![usize::MAX; grid.len()];
        let mut queue = VecDeque::from([grid.start()]);
        dist[grid.start().index()] = 0;
        while let Some(id) = queue.pop_front() {
            if id == grid.end() {
                return Some(dist[id.index()]);
            }
            for n in grid.neighbors(id) {
                if !grid.cell(n).is_wall && dist[n.index()] == usize::MAX {
                    dist[n.index()] = dist[id.index()] + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    #[test]
    fn parses_names() {
        assert_eq!("astar".parse::<PathAlgorithm>(), Ok(PathAlgorithm::AStar));
        assert_eq!("A*".parse::<PathAlgorithm>(), Ok(PathAlgorithm::AStar));
        assert_eq!("Dijkstra".parse::<PathAlgorithm>(), Ok(PathAlgorithm::Dijkstra));
        assert!(matches!(
            "bfs".parse::<PathAlgorithm>(),
            Err(GridError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn open_grid_path_is_manhattan() {
        let grid = Grid::default();
        for algo in PathAlgorithm::ALL {
            let run = search(&grid, algo);
            assert_eq!(path_length(&run.path), 15, "{algo}");
            assert_eq!(run.path.first(), Some(&grid.start()));
            assert_eq!(run.path.last(), Some(&grid.end()));
        }
    }

    #[test]
    fn search_leaves_input_untouched() {
        let grid = Grid::default();
        let before = grid.clone();
        let first = search(&grid, PathAlgorithm::Dijkstra);
        assert_eq!(grid, before);
        assert_eq!(search(&grid, PathAlgorithm::Dijkstra), first);
    }

    #[test]
    fn a_star_never_visits_more_on_open_grid() {
        let grid = Grid::default();
        let d = search(&grid, PathAlgorithm::Dijkstra);
        let a = search(&grid, PathAlgorithm::AStar);
        assert!(a.visited.len() <= d.visited.len());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (prop::collection::vec(prop::bool::weighted(0.3), 8 * 10), 0usize..80, 0usize..80)
            .prop_filter("distinct endpoints", |(_, s, e)| s != e)
            .prop_map(|(walls, s, e)| {
                let mut grid = Grid::new(8, 10, (s / 10, s % 10), (e / 10, e % 10))
                    .expect("valid layout");
                for (i, wall) in walls.into_iter().enumerate() {
                    grid.set_wall(CellId(i), wall);
                }
                grid
            })
    }

    proptest! {
        #[test]
        fn both_engines_find_optimal_paths(grid in arb_grid()) {
            let expected = bfs_distance(&grid);
            for algo in PathAlgorithm::ALL {
                let run = search(&grid, algo);
                match expected {
                    Some(d) => prop_assert_eq!(path_length(&run.path), d),
                    None => prop_assert!(run.path.is_empty()),
                }
                for id in &run.path {
                    prop_assert!(!grid.cell(*id).is_wall);
                }
            }
        }

        #[test]
        fn visited_cells_are_unique_and_open(grid in arb_grid()) {
            for algo in PathAlgorithm::ALL {
                let run = search(&grid, algo);
                let mut seen = std::collections::HashSet::new();
                for id in &run.visited {
                    prop_assert!(seen.insert(*id));
                    prop_assert!(!grid.cell(*id).is_wall);
                }
            }
        }
    }
}
