//! Playback engine for recorded algorithm runs.
//!
//! A run is recorded once, eagerly, when playback starts. The engine then
//! walks a cursor through the recording one step at a time, applying each
//! step to the [`Scene`] it owns. Steps are driven either by ticks (see
//! [`crate::timer`]) or by explicit [`Playback::step`] calls.
//!
//! ```text
//!          start            pause
//!   Idle ─────────▶ Running ─────▶ Paused
//!    ▲                │  ▲           │
//!    │   last step    │  └── start ──┘
//!    └────────────────┘
//!    ▲                                │
//!    └──────────── reset (any) ───────┘
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::timer::{Pacing, ScheduledTick, Speed, TickToken, TimerSlot};

/// A recorded run, split into one or more consecutive phases.
pub trait Recording {
    type Phase: Copy + Eq + fmt::Debug + Serialize + Send + Sync + 'static;

    fn first_phase(&self) -> Self::Phase;

    /// Phase that follows `phase`, or `None` if `phase` is the last.
    fn next_phase(&self, phase: Self::Phase) -> Option<Self::Phase>;

    /// Number of steps in `phase`.
    fn phase_len(&self, phase: Self::Phase) -> usize;

    /// Tick delay while playing `phase`, given the speed-derived base.
    fn phase_delay(&self, _phase: Self::Phase, base: Duration) -> Duration {
        base
    }

    /// Phases in playback order.
    fn phases(&self) -> Vec<Self::Phase> {
        let mut phases = vec![self.first_phase()];
        while let Some(next) = phases.last().and_then(|&p| self.next_phase(p)) {
            phases.push(next);
        }
        phases
    }

    /// Steps across every phase.
    fn total_steps(&self) -> usize {
        self.phases().into_iter().map(|p| self.phase_len(p)).sum()
    }
}

/// Mutable display state that a recording is replayed against.
pub trait Scene {
    type Algorithm: Copy + fmt::Debug + Serialize + Send + Sync + 'static;
    type Recording: Recording + Send + Sync + 'static;
    type Snapshot: Serialize + Send + Sync + 'static;

    /// Clear every run-scoped flag.
    fn clear_run(&mut self);

    /// Run `algorithm` to completion on the current layout.
    fn record(&self, algorithm: Self::Algorithm) -> Self::Recording;

    /// Apply step `index` of `phase`. Steps that no longer fit the scene are
    /// dropped.
    fn apply(&mut self, recording: &Self::Recording, phase: PhaseOf<Self>, index: usize);

    /// Called once after the last step of the last phase.
    fn finish(&mut self, _recording: &Self::Recording) {}

    /// Undo data changes made by a recording, before it is discarded.
    fn rewind(&mut self, _recording: &Self::Recording) {}

    fn snapshot(&self) -> Self::Snapshot;
}

/// Phase type of a scene's recordings.
pub type PhaseOf<S> = <<S as Scene>::Recording as Recording>::Phase;

/// Run state visible to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing is playing. Initial and terminal state.
    Idle,
    /// Ticks are being scheduled.
    Running,
    /// A run is loaded but frozen.
    Paused,
}

/// Playback controller for one scene.
pub struct Playback<S: Scene> {
    scene: S,
    algorithm: S::Algorithm,
    recording: Option<S::Recording>,
    phase: Option<PhaseOf<S>>,
    cursor: usize,
    state: PlaybackState,
    speed: Speed,
    pacing: Pacing,
    timer: TimerSlot,
    revision: u64,
}

impl<S: Scene> Playback<S> {
    /// Create an idle playback over `scene`.
    pub fn new(scene: S, algorithm: S::Algorithm, pacing: Pacing) -> Self {
        Self {
            scene,
            algorithm,
            recording: None,
            phase: None,
            cursor: 0,
            state: PlaybackState::Idle,
            speed: Speed::default(),
            pacing,
            timer: TimerSlot::new(),
            revision: 0,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn algorithm(&self) -> S::Algorithm {
        self.algorithm
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Index into the current phase.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Option<PhaseOf<S>> {
        self.phase
    }

    /// The loaded recording. Kept after a run completes, dropped on reset.
    pub fn recording(&self) -> Option<&S::Recording> {
        self.recording.as_ref()
    }

    /// Bumped on every scene mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a tick is currently armed.
    pub fn is_scheduled(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn armed_tick(&self) -> Option<TickToken> {
        self.timer.armed()
    }

    /// Steps applied so far across every phase.
    pub fn position(&self) -> usize {
        let (Some(recording), Some(current)) = (self.recording.as_ref(), self.phase) else {
            return 0;
        };
        let before: usize = recording
            .phases()
            .into_iter()
            .take_while(|&p| p != current)
            .map(|p| recording.phase_len(p))
            .sum();
        before + self.cursor
    }

    pub fn total_steps(&self) -> usize {
        self.recording.as_ref().map_or(0, Recording::total_steps)
    }

    /// Fraction of the loaded recording applied (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        match self.total_steps() {
            0 => 0.0,
            total => self.position() as f64 / total as f64,
        }
    }

    /// Choose the engine for the next fresh start.
    pub fn select_algorithm(&mut self, algorithm: S::Algorithm) {
        self.algorithm = algorithm;
    }

    /// Change speed. Takes effect from the next scheduled tick.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Mutate the scene directly. Refused unless idle.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        if self.state != PlaybackState::Idle {
            return None;
        }
        self.revision += 1;
        Some(f(&mut self.scene))
    }

    /// Reset, then mutate the scene.
    pub fn reset_and_edit<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        self.reset();
        self.revision += 1;
        f(&mut self.scene)
    }

    /// Start a fresh run from idle, or resume from paused.
    ///
    /// A fresh start records the run, applies its first step immediately
    /// and arms the next tick. A no-op while running.
    pub fn start(&mut self) -> Option<ScheduledTick> {
        match self.state {
            PlaybackState::Running => None,
            PlaybackState::Paused => {
                self.timer.cancel();
                self.state = PlaybackState::Running;
                debug!(position = self.position(), "playback resumed");
                self.schedule()
            }
            PlaybackState::Idle => {
                self.timer.cancel();
                self.scene.clear_run();
                self.revision += 1;

                let recording = self.scene.record(self.algorithm);
                debug!(
                    algorithm = ?self.algorithm,
                    steps = recording.total_steps(),
                    "recorded run"
                );

                self.phase = Some(recording.first_phase());
                self.cursor = 0;
                self.recording = Some(recording);
                self.state = PlaybackState::Running;

                self.advance();
                self.schedule()
            }
        }
    }

    /// Freeze a running playback. Returns `false` if it was not running.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.timer.cancel();
        self.state = PlaybackState::Paused;
        debug!(position = self.position(), "playback paused");
        true
    }

    /// Apply exactly one step.
    ///
    /// From idle this starts a fresh run and pauses right after its first
    /// step. While running it does nothing.
    pub fn step(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => false,
            PlaybackState::Idle => {
                self.start();
                self.pause();
                true
            }
            PlaybackState::Paused => {
                self.advance();
                true
            }
        }
    }

    /// Drop the recording and clear the scene back to its pre-run state.
    pub fn reset(&mut self) {
        self.timer.cancel();
        if let Some(recording) = self.recording.take() {
            self.scene.rewind(&recording);
        }
        self.scene.clear_run();
        self.phase = None;
        self.cursor = 0;
        self.state = PlaybackState::Idle;
        self.revision += 1;
        debug!("playback reset");
    }

    /// Deliver a tick armed earlier.
    ///
    /// Stale tokens and ticks that arrive while not running are ignored.
    /// Returns the next tick to arm, if playback continues.
    pub fn tick(&mut self, token: TickToken) -> Option<ScheduledTick> {
        if !self.timer.fire(token) {
            trace!(?token, "stale tick ignored");
            return None;
        }
        if self.state != PlaybackState::Running {
            return None;
        }
        self.advance();
        self.schedule()
    }

    fn schedule(&mut self) -> Option<ScheduledTick> {
        if self.state != PlaybackState::Running {
            return None;
        }
        let phase = self.phase?;
        let base = self.pacing.delay(self.speed);
        let delay = self.recording.as_ref()?.phase_delay(phase, base);
        Some(self.timer.arm(delay))
    }

    /// Apply the step under the cursor and move past it.
    fn advance(&mut self) {
        if !self.settle() {
            return;
        }
        if let (Some(recording), Some(phase)) = (self.recording.as_ref(), self.phase) {
            trace!(?phase, cursor = self.cursor, "applying step");
            self.scene.apply(recording, phase, self.cursor);
            self.cursor += 1;
            self.revision += 1;
        }
        self.settle();
    }

    /// Move past exhausted phases. Completes the run when none remain.
    ///
    /// Returns `true` while there is a step left to apply.
    fn settle(&mut self) -> bool {
        loop {
            let (Some(recording), Some(phase)) = (self.recording.as_ref(), self.phase) else {
                self.complete();
                return false;
            };
            if self.cursor < recording.phase_len(phase) {
                return true;
            }
            match recording.next_phase(phase) {
                Some(next) => {
                    debug!(from = ?phase, to = ?next, "phase switch");
                    self.phase = Some(next);
                    self.cursor = 0;
                }
                None => {
                    self.complete();
                    return false;
                }
            }
        }
    }

    fn complete(&mut self) {
        self.timer.cancel();
        if self.state == PlaybackState::Idle {
            return;
        }
        if let Some(recording) = self.recording.as_ref() {
            self.scene.finish(recording);
            self.revision += 1;
        }
        self.state = PlaybackState::Idle;
        debug!(steps = self.total_steps(), "playback complete");
    }
}

/// Playback status for sending to the controller.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackStatus<A, P> {
    pub state: PlaybackState,
    pub algorithm: A,
    pub phase: Option<P>,
    pub cursor: usize,
    pub position: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub speed: Speed,
    pub revision: u64,
}

/// Status type for a given scene.
pub type StatusOf<S> = PlaybackStatus<<S as Scene>::Algorithm, PhaseOf<S>>;

impl<S: Scene> From<&Playback<S>> for PlaybackStatus<S::Algorithm, PhaseOf<S>> {
    fn from(playback: &Playback<S>) -> Self {
        Self {
            state: playback.state,
            algorithm: playback.algorithm,
            phase: playback.phase,
            cursor: playback.cursor,
            position: playback.position(),
            total_steps: playback.total_steps(),
            progress: playback.progress(),
            speed: playback.speed,
            revision: playback.revision,
        }
    }
}
