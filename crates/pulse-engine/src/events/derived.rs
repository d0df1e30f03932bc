// events/derived.rs
//
// Small state machines that derive higher-level events from a source stream.
// Each one is fed values plus their timestamps and answers "emit or not".
//
// Usage:
//   let rx = bus.stream("ui:click");
//   let mut double = DoubleTrigger::new(300.0);
//   for ev in rx.drain() {
//       if double.observe(now) { bus.emit("ui:double_click", Event::Signal); }
//   }

use super::channel::Receiver;
use super::event::Event;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DoubleState {
    Idle,
    /// One event seen at this time, waiting for a partner.
    Armed(f64),
    /// Just fired; events closer than the window to `last` are absorbed.
    Cooldown(f64),
}

/// Collapses two events that land within `window_ms` into one trigger.
///
/// A third event inside the window is absorbed and does not retrigger. The
/// detector only re-arms after a quiet gap of at least the window.
#[derive(Debug, Clone)]
pub struct DoubleTrigger {
    window_ms: f64,
    state: DoubleState,
}

impl DoubleTrigger {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            state: DoubleState::Idle,
        }
    }

    /// Feed one source event observed at `now`. Returns true when the pair completes.
    pub fn observe(&mut self, now: f64) -> bool {
        let (next, fired) = match self.state {
            DoubleState::Idle => (DoubleState::Armed(now), false),
            DoubleState::Armed(first) if now - first <= self.window_ms => {
                (DoubleState::Cooldown(now), true)
            }
            DoubleState::Armed(_) => (DoubleState::Armed(now), false),
            DoubleState::Cooldown(last) if now - last < self.window_ms => {
                (DoubleState::Cooldown(now), false)
            }
            DoubleState::Cooldown(_) => (DoubleState::Armed(now), false),
        };
        self.state = next;
        fired
    }

    /// Feed everything queued on `rx`, returning the events that completed a pair.
    pub fn pump(&mut self, rx: &Receiver<Event>, now: f64) -> Vec<Event> {
        rx.drain()
            .into_iter()
            .filter(|_| self.observe(now))
            .collect()
    }

    pub fn reset(&mut self) {
        self.state = DoubleState::Idle;
    }
}

/// Counts consecutive occurrences of an event.
///
/// Emits the running count once it reaches `threshold` and on every increment
/// after that. Only `reset` brings it back to zero; an idle streak never expires.
#[derive(Debug, Clone)]
pub struct StreakCounter {
    threshold: u32,
    count: u32,
}

impl StreakCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            count: 0,
        }
    }

    pub fn record(&mut self) -> Option<u32> {
        self.count = self.count.saturating_add(1);
        (self.count >= self.threshold).then_some(self.count)
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Which side of the boundary counts as "crossed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Below,
    Above,
}

/// Re-emits a numeric slice only while it sits past a boundary, and only when
/// it changed since the previous observation.
#[derive(Debug, Clone)]
pub struct ThresholdMonitor {
    boundary: f64,
    crossing: Crossing,
    last: Option<f64>,
}

impl ThresholdMonitor {
    pub fn new(boundary: f64, crossing: Crossing) -> Self {
        Self {
            boundary,
            crossing,
            last: None,
        }
    }

    pub fn below(boundary: f64) -> Self {
        Self::new(boundary, Crossing::Below)
    }

    pub fn above(boundary: f64) -> Self {
        Self::new(boundary, Crossing::Above)
    }

    pub fn observe(&mut self, value: f64) -> Option<f64> {
        if self.last == Some(value) {
            return None;
        }
        self.last = Some(value);
        let past = match self.crossing {
            Crossing::Below => value < self.boundary,
            Crossing::Above => value > self.boundary,
        };
        past.then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::registry::EventRegistry;

    #[test]
    fn double_trigger_pairs_within_window() {
        let mut d = DoubleTrigger::new(300.0);
        assert!(!d.observe(0.0));
        assert!(d.observe(250.0));
    }

    #[test]
    fn double_trigger_third_event_does_not_retrigger() {
        let mut d = DoubleTrigger::new(300.0);
        assert!(!d.observe(0.0));
        assert!(d.observe(100.0));
        assert!(!d.observe(200.0));
        assert!(!d.observe(450.0));
        // quiet gap of 300ms re-arms
        assert!(!d.observe(800.0));
        assert!(d.observe(900.0));
    }

    #[test]
    fn double_trigger_slow_pair_rearms() {
        let mut d = DoubleTrigger::new(300.0);
        assert!(!d.observe(0.0));
        assert!(!d.observe(400.0));
        assert!(d.observe(600.0));
    }

    #[test]
    fn double_trigger_pumps_a_stream() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream("ui:click");
        bus.emit("ui:click", Event::Signal);
        bus.emit("ui:click", Event::Signal);
        let mut d = DoubleTrigger::new(300.0);
        assert_eq!(d.pump(&rx, 10.0).len(), 1);
        assert!(rx.is_empty());
    }

    #[test]
    fn streak_reports_from_threshold_on() {
        let mut s = StreakCounter::new(3);
        assert_eq!(s.record(), None);
        assert_eq!(s.record(), None);
        assert_eq!(s.record(), Some(3));
        assert_eq!(s.record(), Some(4));
        s.reset();
        assert_eq!(s.count(), 0);
        assert_eq!(s.record(), None);
    }

    #[test]
    fn threshold_monitor_skips_duplicates() {
        let mut m = ThresholdMonitor::below(20.0);
        assert_eq!(m.observe(50.0), None);
        assert_eq!(m.observe(15.0), Some(15.0));
        assert_eq!(m.observe(15.0), None);
        assert_eq!(m.observe(12.0), Some(12.0));
        assert_eq!(m.observe(25.0), None);
    }

    #[test]
    fn threshold_monitor_above() {
        let mut m = ThresholdMonitor::above(100.0);
        assert_eq!(m.observe(100.0), None);
        assert_eq!(m.observe(101.0), Some(101.0));
    }
}
