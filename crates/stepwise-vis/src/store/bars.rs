//! Array-of-bars state for the sorting visualizer.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stepwise_sort::{SortAlgorithm, SortEvent, SortRun};

use crate::playback::{Recording, Scene};

/// Smallest random array.
pub const MIN_ARRAY_SIZE: usize = 5;
/// Largest random array.
pub const MAX_ARRAY_SIZE: usize = 100;

const RANDOM_VALUES: RangeInclusive<u32> = 5..=104;

/// One bar of the sorting visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub value: u32,
    pub is_comparing: bool,
    pub is_sorted: bool,
    pub is_swapping: bool,
}

/// The single highlight a bar should be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarTone {
    Plain,
    Comparing,
    Swapping,
    Sorted,
}

impl Bar {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            is_comparing: false,
            is_sorted: false,
            is_swapping: false,
        }
    }

    /// Sorted dominates swapping, which dominates comparing.
    pub fn tone(&self) -> BarTone {
        if self.is_sorted {
            BarTone::Sorted
        } else if self.is_swapping {
            BarTone::Swapping
        } else if self.is_comparing {
            BarTone::Comparing
        } else {
            BarTone::Plain
        }
    }
}

/// Phase of a sorting replay. Sorting has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortPhase {
    Replaying,
}

/// A recorded sort plus the array it started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRecording {
    pub initial: Vec<u32>,
    pub run: SortRun,
}

impl Recording for SortRecording {
    type Phase = SortPhase;

    fn first_phase(&self) -> SortPhase {
        SortPhase::Replaying
    }

    fn next_phase(&self, _phase: SortPhase) -> Option<SortPhase> {
        None
    }

    fn phase_len(&self, _phase: SortPhase) -> usize {
        self.run.events.len()
    }
}

/// Bars plus the RNG used to regenerate them.
pub struct BarStore {
    bars: Vec<Bar>,
    rng: StdRng,
}

impl BarStore {
    /// Random array of `size` bars, clamped to the allowed range.
    pub fn random(size: usize, rng: StdRng) -> Self {
        let mut store = Self {
            bars: Vec::new(),
            rng,
        };
        store.regenerate(size);
        store
    }

    pub fn from_values(values: impl IntoIterator<Item = u32>, rng: StdRng) -> Self {
        Self {
            bars: values.into_iter().map(Bar::new).collect(),
            rng,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn values(&self) -> Vec<u32> {
        self.bars.iter().map(|b| b.value).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Replace the array with `size` random values (size clamped to
    /// 5..=100).
    pub fn regenerate(&mut self, size: usize) {
        let size = size.clamp(MIN_ARRAY_SIZE, MAX_ARRAY_SIZE);
        let rng = &mut self.rng;
        self.bars = (0..size)
            .map(|_| Bar::new(rng.gen_range(RANDOM_VALUES)))
            .collect();
    }

    /// Replace the array. An empty list is ignored and returns `false`.
    pub fn set_values(&mut self, values: Vec<u32>) -> bool {
        if values.is_empty() {
            return false;
        }
        self.bars = values.into_iter().map(Bar::new).collect();
        true
    }

    /// Parse comma-separated integers and replace the array with them.
    ///
    /// Tokens that are not non-negative integers are dropped. If nothing
    /// valid remains the array is left alone and `false` is returned.
    pub fn set_custom_input(&mut self, raw: &str) -> bool {
        self.set_values(parse_custom_input(raw))
    }
}

/// Comma-separated non-negative integers, invalid tokens skipped.
pub fn parse_custom_input(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|token| token.trim().parse().ok())
        .collect()
}

fn apply_event(bars: &mut [Bar], event: &SortEvent) {
    for bar in bars.iter_mut() {
        bar.is_comparing = false;
        bar.is_swapping = false;
    }

    match event {
        SortEvent::Compare { indices } => {
            for &i in indices {
                if let Some(bar) = bars.get_mut(i) {
                    bar.is_comparing = true;
                }
            }
        }
        SortEvent::Swap { indices } => {
            for &i in indices {
                if let Some(bar) = bars.get_mut(i) {
                    bar.is_swapping = true;
                }
            }
        }
        SortEvent::Update { .. } => {
            for (index, value) in event.writes() {
                if let Some(bar) = bars.get_mut(index) {
                    bar.value = value;
                    bar.is_swapping = true;
                }
            }
        }
        SortEvent::Sorted { indices } => {
            for &i in indices {
                if let Some(bar) = bars.get_mut(i) {
                    bar.is_sorted = true;
                }
            }
        }
    }
}

/// Rebuild the bars after applying the first `up_to` events to `initial`.
pub fn replay_bars(initial: &[u32], events: &[SortEvent], up_to: usize) -> Vec<Bar> {
    let mut bars: Vec<Bar> = initial.iter().copied().map(Bar::new).collect();
    for event in events.iter().take(up_to) {
        apply_event(&mut bars, event);
    }
    bars
}

/// Bars as sent to the controller.
#[derive(Debug, Clone, Serialize)]
pub struct ArraySnapshot {
    pub bars: Vec<Bar>,
    pub tones: Vec<BarTone>,
}

impl Scene for BarStore {
    type Algorithm = SortAlgorithm;
    type Recording = SortRecording;
    type Snapshot = ArraySnapshot;

    fn clear_run(&mut self) {
        for bar in &mut self.bars {
            *bar = Bar::new(bar.value);
        }
    }

    fn record(&self, algorithm: SortAlgorithm) -> SortRecording {
        let initial = self.values();
        let run = algorithm.run(&initial);
        SortRecording { initial, run }
    }

    fn apply(&mut self, recording: &SortRecording, _phase: SortPhase, index: usize) {
        if let Some(event) = recording.run.events.get(index) {
            apply_event(&mut self.bars, event);
        }
    }

    fn finish(&mut self, _recording: &SortRecording) {
        for bar in &mut self.bars {
            bar.is_sorted = true;
            bar.is_comparing = false;
            bar.is_swapping = false;
        }
    }

    fn rewind(&mut self, recording: &SortRecording) {
        if recording.initial.len() != self.bars.len() {
            return;
        }
        for (bar, &value) in self.bars.iter_mut().zip(&recording.initial) {
            bar.value = value;
        }
    }

    fn snapshot(&self) -> ArraySnapshot {
        ArraySnapshot {
            bars: self.bars.clone(),
            tones: self.bars.iter().map(Bar::tone).collect(),
        }
    }
}
