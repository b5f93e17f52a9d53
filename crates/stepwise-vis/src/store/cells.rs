//! Grid-of-cells state for the pathfinding visualizer.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stepwise_grid::{search, CellId, Grid, GridError, PathAlgorithm};

use crate::playback::{Recording, Scene};

/// Phases of a pathfinding replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPhase {
    /// Marking cells in the order the search finalized them.
    Visiting,
    /// Marking the reconstructed shortest path.
    TracingPath,
}

/// The two logs produced by one search, plus the scored working grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathRecording {
    pub visited: Vec<CellId>,
    pub path: Vec<CellId>,
    /// Distances, back-pointers and A* scores as the search left them.
    pub scored: Grid,
}

impl PathRecording {
    fn log(&self, phase: PathPhase) -> &[CellId] {
        match phase {
            PathPhase::Visiting => &self.visited,
            PathPhase::TracingPath => &self.path,
        }
    }
}

impl Recording for PathRecording {
    type Phase = PathPhase;

    fn first_phase(&self) -> PathPhase {
        PathPhase::Visiting
    }

    fn next_phase(&self, phase: PathPhase) -> Option<PathPhase> {
        match phase {
            PathPhase::Visiting => Some(PathPhase::TracingPath),
            PathPhase::TracingPath => None,
        }
    }

    fn phase_len(&self, phase: PathPhase) -> usize {
        self.log(phase).len()
    }

    /// The path is traced at twice the visiting rate.
    fn phase_delay(&self, phase: PathPhase, base: Duration) -> Duration {
        match phase {
            PathPhase::Visiting => base,
            PathPhase::TracingPath => base / 2,
        }
    }
}

/// Interactive edits a user can make to an idle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    /// Click: flip the wall flag.
    ToggleWall,
    /// Drag with the wall brush.
    DrawWall,
    /// Drag with the eraser.
    EraseWall,
    MoveStart,
    MoveEnd,
}

/// Grid plus the RNG used for random walls.
pub struct GridStore {
    grid: Grid,
    rng: StdRng,
}

impl GridStore {
    /// Fraction of cells walled by [`GridStore::randomize_walls`].
    pub const WALL_DENSITY: f64 = 0.3;

    pub fn new(grid: Grid, rng: StdRng) -> Self {
        Self { grid, rng }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Apply one edit at `(row, col)`.
    ///
    /// Returns whether the grid changed. Edits that would wall or overlap
    /// the start and end markers are silently refused.
    pub fn edit(&mut self, row: usize, col: usize, action: EditAction) -> Result<bool, GridError> {
        let id = self.grid.checked_id(row, col)?;
        let changed = match action {
            EditAction::ToggleWall => self.grid.toggle_wall(id),
            EditAction::DrawWall => self.grid.set_wall(id, true),
            EditAction::EraseWall => self.grid.set_wall(id, false),
            EditAction::MoveStart => self.grid.move_start(id),
            EditAction::MoveEnd => self.grid.move_end(id),
        };
        Ok(changed)
    }

    pub fn clear_walls(&mut self) {
        self.grid.clear_walls();
    }

    /// Replace the walls with a random layout. Each non-endpoint cell
    /// becomes a wall with probability `density`.
    pub fn randomize_walls(&mut self, density: f64) {
        let density = density.clamp(0.0, 1.0);
        for index in 0..self.grid.len() {
            let wall = self.rng.gen_bool(density);
            self.grid.set_wall(CellId(index), wall);
        }
    }
}

/// Grid as sent to the controller.
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub grid: Grid,
}

impl Scene for GridStore {
    type Algorithm = PathAlgorithm;
    type Recording = PathRecording;
    type Snapshot = GridSnapshot;

    fn clear_run(&mut self) {
        self.grid.clear_run();
    }

    fn record(&self, algorithm: PathAlgorithm) -> PathRecording {
        let run = search(&self.grid, algorithm);
        PathRecording {
            visited: run.visited,
            path: run.path,
            scored: run.scored,
        }
    }

    fn apply(&mut self, recording: &PathRecording, phase: PathPhase, index: usize) {
        let Some(&id) = recording.log(phase).get(index) else {
            return;
        };
        let Some(cell) = self.grid.get_mut(id) else {
            return;
        };
        if phase == PathPhase::Visiting {
            if let Some(scored) = recording.scored.get(id) {
                cell.copy_scores(scored);
            }
        }
        if cell.is_endpoint() {
            return;
        }
        match phase {
            PathPhase::Visiting => cell.is_visited = true,
            PathPhase::TracingPath => cell.is_path = true,
        }
    }

    fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            grid: self.grid.clone(),
        }
    }
}
