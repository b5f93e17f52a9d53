//! Tick pacing and the single armed-timer slot.
//!
//! The playback engine never sleeps itself. It hands out a
//! [`ScheduledTick`] (token + delay) and whoever drives it calls
//! [`Playback::tick`](crate::Playback::tick) with that token once the delay
//! has elapsed. Only the most recently armed token is honoured, so a tick
//! that fires after a pause, reset or restart is a no-op.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Playback speed as a percentage, 1 (slowest) to 100 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);

    /// Clamp `percent` into 1..=100.
    pub fn new(percent: u32) -> Self {
        Speed(percent.clamp(Self::MIN.0 as u32, Self::MAX.0 as u32) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl From<u32> for Speed {
    fn from(percent: u32) -> Self {
        Speed::new(percent)
    }
}

impl From<Speed> for u32 {
    fn from(speed: Speed) -> Self {
        u32::from(speed.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(50)
    }
}

/// Maps a [`Speed`] to a tick delay: `base - speed * per_unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub base: Duration,
    pub per_unit: Duration,
}

impl Pacing {
    pub fn new(base: Duration, per_unit: Duration) -> Self {
        Self { base, per_unit }
    }

    /// Delay between ticks at `speed`. Saturates at zero.
    pub fn delay(&self, speed: Speed) -> Duration {
        self.base
            .saturating_sub(self.per_unit * u32::from(speed.percent()))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
            per_unit: Duration::from_millis(9),
        }
    }
}

/// Identifies one armed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// A tick the driver should deliver after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub delay: Duration,
}

/// Holds at most one armed tick.
#[derive(Debug, Default)]
pub struct TimerSlot {
    generation: u64,
    armed: Option<TickToken>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new tick, invalidating whatever was armed before.
    pub fn arm(&mut self, delay: Duration) -> ScheduledTick {
        self.generation += 1;
        let token = TickToken(self.generation);
        self.armed = Some(token);
        ScheduledTick { token, delay }
    }

    /// Invalidate the armed tick, if any.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Consume `token` if it is the armed one. Returns `false` for stale or
    /// cancelled tokens.
    pub fn fire(&mut self, token: TickToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed(&self) -> Option<TickToken> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_clamps() {
        assert_eq!(Speed::new(0), Speed::MIN);
        assert_eq!(Speed::new(500), Speed::MAX);
        assert_eq!(Speed::new(42).percent(), 42);
    }

    #[test]
    fn deserialized_speed_is_clamped() {
        assert_eq!(serde_json::from_str::<Speed>("0").unwrap(), Speed::MIN);
        assert_eq!(serde_json::from_str::<Speed>("255").unwrap(), Speed::MAX);
        assert_eq!(serde_json::to_string(&Speed::new(70)).unwrap(), "70");
    }

    #[test]
    fn default_pacing_delays() {
        let pacing = Pacing::default();
        assert_eq!(pacing.delay(Speed::new(50)), Duration::from_millis(550));
        assert_eq!(pacing.delay(Speed::MIN), Duration::from_millis(991));
        assert_eq!(pacing.delay(Speed::MAX), Duration::from_millis(100));
    }

    #[test]
    fn pacing_saturates() {
        let pacing = Pacing::new(Duration::from_millis(100), Duration::from_millis(5));
        assert_eq!(pacing.delay(Speed::MAX), Duration::ZERO);
    }

    #[test]
    fn only_latest_token_fires() {
        let mut slot = TimerSlot::new();
        let first = slot.arm(Duration::from_millis(10));
        let second = slot.arm(Duration::from_millis(10));

        assert!(!slot.fire(first.token));
        assert!(slot.fire(second.token));
        // Consumed
        assert!(!slot.fire(second.token));
        assert!(!slot.is_armed());
    }

    #[test]
    fn cancel_invalidates() {
        let mut slot = TimerSlot::new();
        let tick = slot.arm(Duration::from_millis(10));
        slot.cancel();
        assert!(!slot.fire(tick.token));
    }

    proptest::proptest! {
        #[test]
        fn faster_never_waits_longer(a in 0u32..200, b in 0u32..200) {
            let pacing = Pacing::default();
            let (slow, fast) = (Speed::new(a.min(b)), Speed::new(a.max(b)));
            proptest::prop_assert!(pacing.delay(fast) <= pacing.delay(slow));
        }
    }
}
