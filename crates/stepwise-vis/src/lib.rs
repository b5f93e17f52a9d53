//! Stepwise Visualization
//!
//! Step-by-step playback of sorting and pathfinding runs, with a JSON and
//! WebSocket control API.
//!
//! # Architecture
//!
//! - **Engines** (`stepwise-sort`, `stepwise-grid`): run an algorithm to
//!   completion and return ordered logs
//! - **Playback**: walks a cursor through a recorded run, applying one step
//!   per tick to a scene
//! - **Stores**: the bars and cells a viewer draws
//! - **Session**: shares a playback between requests and drives its ticks
//! - **Server**: REST controls plus a WebSocket frame stream per visualizer
//!
//! # Usage
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use stepwise_sort::SortAlgorithm;
//! use stepwise_vis::{BarStore, Pacing, Playback, PlaybackState};
//!
//! let bars = BarStore::from_values([5, 3, 8, 1, 2], StdRng::seed_from_u64(0));
//! let mut playback = Playback::new(bars, SortAlgorithm::Insertion, Pacing::default());
//!
//! playback.step();
//! while playback.state() == PlaybackState::Paused {
//!     playback.step();
//! }
//! assert_eq!(playback.scene().values(), vec![1, 2, 3, 5, 8]);
//! ```

pub mod config;
pub mod error;
pub mod playback;
pub mod server;
pub mod session;
pub mod store;
pub mod timer;

pub use config::VisConfig;
pub use error::{Error, Result};
pub use playback::{Playback, PlaybackState, PlaybackStatus, Recording, Scene};
pub use server::{AppState, Command, VisServer};
pub use session::{Frame, Session};
pub use store::{BarStore, EditAction, GridStore, PathPhase, SortPhase};
pub use timer::{Pacing, Speed};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use stepwise_grid::{Grid, PathAlgorithm};
    use stepwise_sort::SortAlgorithm;

    fn drain<S: Scene>(playback: &mut Playback<S>) -> usize {
        let mut steps = 0;
        playback.step();
        steps += 1;
        while playback.state() == PlaybackState::Paused {
            playback.step();
            steps += 1;
        }
        steps
    }

    #[test]
    fn stepping_a_sort_matches_the_event_count() {
        let bars = BarStore::from_values([5, 3, 8, 1, 2], StdRng::seed_from_u64(0));
        let mut playback = Playback::new(bars, SortAlgorithm::Quick, Pacing::default());
        let steps = drain(&mut playback);

        assert_eq!(steps, playback.total_steps());
        assert_eq!(playback.position(), playback.total_steps());
        assert!(playback.scene().bars().iter().all(|b| b.is_sorted));
    }

    #[test]
    fn completed_run_keeps_its_recording_until_reset() {
        let bars = BarStore::from_values([2, 1], StdRng::seed_from_u64(0));
        let mut playback = Playback::new(bars, SortAlgorithm::Merge, Pacing::default());
        drain(&mut playback);
        assert!(playback.recording().is_some());
        assert_eq!(playback.scene().values(), vec![1, 2]);

        playback.reset();
        assert!(playback.recording().is_none());
        assert_eq!(playback.scene().values(), vec![2, 1]);
    }

    #[test]
    fn unreachable_end_visits_then_finishes() {
        let mut grid = Grid::new(3, 3, (0, 0), (2, 2)).unwrap();
        for (r, c) in [(1, 2), (2, 1)] {
            let id = grid.id(r, c).unwrap();
            grid.set_wall(id, true);
        }
        let cells = GridStore::new(grid, StdRng::seed_from_u64(0));
        let mut playback = Playback::new(cells, PathAlgorithm::Dijkstra, Pacing::default());
        drain(&mut playback);

        assert_eq!(playback.state(), PlaybackState::Idle);
        let grid = playback.scene().grid();
        assert!(grid.cells().iter().all(|c| !c.is_path));
        assert!(grid.cells().iter().any(|c| c.is_visited));
        assert!(!grid.cell(grid.end()).is_visited);
    }

    #[test]
    fn reset_clears_search_scores() {
        let cells = GridStore::new(Grid::default(), StdRng::seed_from_u64(0));
        let mut playback = Playback::new(cells, PathAlgorithm::Dijkstra, Pacing::default());
        drain(&mut playback);

        let scored = playback
            .scene()
            .grid()
            .cells()
            .iter()
            .filter(|c| c.is_visited && c.distance.is_some() && c.previous.is_some())
            .count();
        assert!(scored > 0);

        playback.reset();
        let grid = playback.scene().grid();
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.distance.is_none() && c.previous.is_none() && c.f_score.is_none()));
    }

    #[test]
    fn status_serializes_lowercase_state() {
        let bars = BarStore::from_values([1], StdRng::seed_from_u64(0));
        let playback = Playback::new(bars, SortAlgorithm::Insertion, Pacing::default());
        let status = PlaybackStatus::from(&playback);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["algorithm"], "insertion");
        assert_eq!(json["speed"], 50);
    }
}
