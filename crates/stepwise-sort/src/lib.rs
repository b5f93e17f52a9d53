//! Stepwise Sorting Engines
//!
//! Instrumented sorting algorithms that run to completion eagerly and return
//! both the sorted output and an ordered, immutable event log.
//!
//! # Replay contract
//!
//! Applying every [`SortEvent::Update`] in log order to the original input
//! reproduces [`SortRun::sorted`] exactly, passing only through arrays the
//! algorithm itself produced. Flag-only events (`compare`, `swap`,
//! `sorted`) never change data.
//!
//! Every engine ends its log with one `sorted` event per index, ascending.
//!
//! # Usage
//!
//! ```
//! use stepwise_sort::SortAlgorithm;
//!
//! let run = SortAlgorithm::Insertion.run(&[5, 3, 8, 1, 2]);
//! assert_eq!(run.sorted, vec![1, 2, 3, 5, 8]);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod events;
mod insertion;
mod merge;
mod quick;

pub use events::{replay_updates, Recorder, SortEvent};
pub use insertion::insertion_sort;
pub use merge::merge_sort;
pub use quick::quick_sort;

/// Output of one instrumented sort.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortRun {
    /// The fully sorted values.
    pub sorted: Vec<u32>,
    /// Ordered event log sufficient to replay the sort.
    pub events: Vec<SortEvent>,
}

/// Available sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortAlgorithm {
    #[default]
    Insertion,
    Merge,
    Quick,
}

impl SortAlgorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [SortAlgorithm; 3] = [
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
        SortAlgorithm::Quick,
    ];

    /// Run this algorithm over `values`.
    pub fn run(self, values: &[u32]) -> SortRun {
        match self {
            SortAlgorithm::Insertion => insertion_sort(values),
            SortAlgorithm::Merge => merge_sort(values),
            SortAlgorithm::Quick => quick_sort(values),
        }
    }

    /// Stable identifier used by [`FromStr`] and serialization.
    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Quick => "quick",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An algorithm name that does not match any engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for SortAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.name() == wanted)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_names() {
        assert_eq!("quick".parse::<SortAlgorithm>(), Ok(SortAlgorithm::Quick));
        assert_eq!(" Merge ".parse::<SortAlgorithm>(), Ok(SortAlgorithm::Merge));
        assert!("bogo".parse::<SortAlgorithm>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for algo in SortAlgorithm::ALL {
            assert_eq!(algo.to_string().parse::<SortAlgorithm>(), Ok(algo));
        }
    }

    #[test]
    fn log_length_is_deterministic() {
        let input = [9, 4, 7, 1, 1, 0, 12];
        for algo in SortAlgorithm::ALL {
            assert_eq!(algo.run(&input), algo.run(&input));
        }
    }

    proptest! {
        #[test]
        fn every_engine_matches_reference_sort(values in prop::collection::vec(0u32..200, 0..60)) {
            let mut expected = values.clone();
            expected.sort_unstable();
            for algo in SortAlgorithm::ALL {
                prop_assert_eq!(&algo.run(&values).sorted, &expected);
            }
        }

        #[test]
        fn update_replay_reconstructs_output(values in prop::collection::vec(0u32..200, 0..60)) {
            for algo in SortAlgorithm::ALL {
                let run = algo.run(&values);
                prop_assert_eq!(replay_updates(&values, &run.events), run.sorted);
            }
        }

        #[test]
        fn events_stay_in_bounds(values in prop::collection::vec(0u32..50, 1..40)) {
            for algo in SortAlgorithm::ALL {
                let run = algo.run(&values);
                for event in &run.events {
                    prop_assert!(event.indices().iter().all(|&i| i < values.len()));
                }
            }
        }
    }
}
