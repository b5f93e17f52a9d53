//! Sorting event vocabulary and the recorder that collects it.
//!
//! A sort run produces an ordered, immutable list of [`SortEvent`]s. Only
//! [`SortEvent::Update`] carries data; the other variants exist so a viewer
//! can show what the algorithm is looking at.

/// One discrete step of an instrumented sort.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum SortEvent {
    /// Positions being compared. No data changes.
    Compare { indices: Vec<usize> },
    /// Positions about to receive new values.
    Swap { indices: Vec<usize> },
    /// Position `indices[k]` takes `values[k]`.
    Update { indices: Vec<usize>, values: Vec<u32> },
    /// Positions that are final. Never un-set for the rest of a run.
    Sorted { indices: Vec<usize> },
}

impl SortEvent {
    /// Positions touched by this event.
    pub fn indices(&self) -> &[usize] {
        match self {
            SortEvent::Compare { indices }
            | SortEvent::Swap { indices }
            | SortEvent::Update { indices, .. }
            | SortEvent::Sorted { indices } => indices,
        }
    }

    /// Value assignments carried by this event, as `(index, value)` pairs.
    ///
    /// Empty for everything except [`SortEvent::Update`]. A mismatched
    /// `values` length truncates to the shorter side.
    pub fn writes(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        let (indices, values): (&[usize], &[u32]) = match self {
            SortEvent::Update { indices, values } => (indices, values),
            _ => (&[], &[]),
        };
        indices.iter().copied().zip(values.iter().copied())
    }

    /// Short lowercase tag, matching the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            SortEvent::Compare { .. } => "compare",
            SortEvent::Swap { .. } => "swap",
            SortEvent::Update { .. } => "update",
            SortEvent::Sorted { .. } => "sorted",
        }
    }
}

/// Accumulator threaded through the sorting engines.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<SortEvent>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compare(&mut self, a: usize, b: usize) {
        self.events.push(SortEvent::Compare { indices: vec![a, b] });
    }

    pub fn swap(&mut self, indices: &[usize]) {
        self.events.push(SortEvent::Swap {
            indices: indices.to_vec(),
        });
    }

    pub fn update(&mut self, writes: &[(usize, u32)]) {
        let (indices, values) = writes.iter().copied().unzip();
        self.events.push(SortEvent::Update { indices, values });
    }

    /// Emit one `sorted` event per index, ascending.
    pub fn sorted_all(&mut self, len: usize) {
        self.events
            .extend((0..len).map(|i| SortEvent::Sorted { indices: vec![i] }));
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the recorder, yielding the finished log.
    pub fn finish(self) -> Vec<SortEvent> {
        self.events
    }
}

/// Apply only the `update` events of `events` to a copy of `initial`.
///
/// Writes that fall outside the array are dropped.
pub fn replay_updates(initial: &[u32], events: &[SortEvent]) -> Vec<u32> {
    let mut values = initial.to_vec();
    for (index, value) in events.iter().flat_map(SortEvent::writes) {
        if let Some(slot) = values.get_mut(index) {
            *slot = value;
        }
    }
    values
}
