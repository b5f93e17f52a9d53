//! Shared fixtures for the cross-crate tests in `tests/`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use stepwise_grid::Grid;
use stepwise_vis::{BarStore, GridStore, Playback, PlaybackState, Scene};

/// Bars with a fixed RNG, so regeneration is reproducible too.
pub fn bars(values: &[u32]) -> BarStore {
    BarStore::from_values(values.iter().copied(), StdRng::seed_from_u64(0))
}

pub fn cells(grid: Grid) -> GridStore {
    GridStore::new(grid, StdRng::seed_from_u64(0))
}

/// Grid with start top-left, end bottom-right and the given walls.
///
/// Walls on the endpoints are ignored.
pub fn walled_grid(rows: usize, cols: usize, walls: &[(usize, usize)]) -> Grid {
    let mut grid = match Grid::new(rows, cols, (0, 0), (rows - 1, cols - 1)) {
        Ok(grid) => grid,
        Err(e) => panic!("fixture grid {rows}x{cols}: {e}"),
    };
    for &(row, col) in walls {
        if let Some(id) = grid.id(row, col) {
            grid.set_wall(id, true);
        }
    }
    grid
}

/// Step a playback from idle until it completes, capturing a snapshot
/// after every step.
pub fn step_to_end<S: Scene>(playback: &mut Playback<S>) -> Vec<S::Snapshot> {
    let mut frames = Vec::new();
    playback.step();
    frames.push(playback.scene().snapshot());
    while playback.state() == PlaybackState::Paused {
        playback.step();
        frames.push(playback.scene().snapshot());
    }
    frames
}
