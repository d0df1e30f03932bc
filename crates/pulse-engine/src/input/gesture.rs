// input/gesture.rs
//
// Gesture recognizer: turns raw touch primitives into semantic gestures.
//
// Usage:
//   let mut gestures = GestureRecognizer::new(GestureConfig::default());
//   let rx = gestures.subscribe();
//   gestures.touch_start(0, Vec2::new(10.0, 10.0), now, &mut bus);
//   gestures.touch_end(0, Vec2::new(11.0, 10.0), now + 80.0, &mut bus);
//   gestures.tick(now + 400.0, &mut bus);   // flushes the deferred tap
//
// Single-finger classifiers (tap, long-press, swipe) share one contact and the
// first one to fire claims it. Taps are held back for the double-tap window so
// a pair of taps yields exactly one DoubleTap.

use std::collections::HashMap;
use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::timer::{TimerId, TimerQueue};
use crate::events::{names, Channel, Event, EventRegistry, Receiver};
use super::queue::InputEvent;

/// Timing and distance thresholds. Distances are CSS pixels, times milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub tap_max_duration_ms: f64,
    pub tap_max_distance: f32,
    pub double_tap_window_ms: f64,
    pub double_tap_max_distance: f32,
    pub long_press_delay_ms: f64,
    pub long_press_max_distance: f32,
    pub swipe_min_distance: f32,
    pub swipe_max_duration_ms: f64,
    /// Minimum scale change before another pinch is emitted.
    pub pinch_threshold: f32,
    /// Minimum angle change (radians) before another rotate is emitted.
    pub rotate_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_duration_ms: 200.0,
            tap_max_distance: 10.0,
            double_tap_window_ms: 300.0,
            double_tap_max_distance: 50.0,
            long_press_delay_ms: 500.0,
            long_press_max_distance: 10.0,
            swipe_min_distance: 50.0,
            swipe_max_duration_ms: 300.0,
            pinch_threshold: 0.01,
            rotate_threshold: 0.02,
        }
    }
}

/// One physical contact sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TouchPoint {
    pub id: u32,
    pub pos: Vec2,
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Dominant axis of the displacement; ties go horizontal. Screen Y grows downward.
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if delta.y >= 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zoom {
    In,
    Out,
}

/// Gesture payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    Tap { pos: Vec2 },
    DoubleTap { pos: Vec2 },
    LongPress { pos: Vec2, held_ms: f64 },
    /// `velocity` is pixels per millisecond.
    Swipe { direction: SwipeDirection, distance: f32, velocity: f32 },
    Pinch { scale: f32, center: Vec2, zoom: Zoom },
    /// `angle` is radians relative to the start of the two-finger gesture.
    Rotate { angle: f32, center: Vec2 },
}

impl Gesture {
    /// Stream suffix for `gesture:<name>`.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Tap { .. } => "tap",
            Gesture::DoubleTap { .. } => "double_tap",
            Gesture::LongPress { .. } => "long_press",
            Gesture::Swipe { .. } => "swipe",
            Gesture::Pinch { .. } => "pinch",
            Gesture::Rotate { .. } => "rotate",
        }
    }
}

/// A recognized gesture with the contacts that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub points: Vec<TouchPoint>,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    LongPress { contact: u32, due: f64 },
    TapFlush { due: f64 },
}

#[derive(Debug, Clone)]
struct Contact {
    start: TouchPoint,
    current: TouchPoint,
    long_press: Option<TimerId>,
    /// Set once a classifier fired or a second finger took over.
    claimed: bool,
}

impl Contact {
    fn displacement(&self) -> f32 {
        self.current.pos.distance(self.start.pos)
    }
}

#[derive(Debug, Clone)]
struct HeldTap {
    start: TouchPoint,
    end: TouchPoint,
    flush: TimerId,
}

#[derive(Debug, Clone)]
struct TwoFinger {
    a: u32,
    b: u32,
    start_distance: f32,
    start_angle: f32,
    last_scale: f32,
    last_angle: f32,
}

/// Stateful recognizer over the set of active contacts.
pub struct GestureRecognizer {
    config: GestureConfig,
    contacts: HashMap<u32, Contact>,
    timers: TimerQueue<Pending>,
    held_tap: Option<HeldTap>,
    two_finger: Option<TwoFinger>,
    channel: Channel<GestureEvent>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            contacts: HashMap::new(),
            timers: TimerQueue::new(),
            held_tap: None,
            two_finger: None,
            channel: Channel::new(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Dedicated gesture stream.
    pub fn subscribe(&mut self) -> Receiver<GestureEvent> {
        self.channel.subscribe()
    }

    /// Number of contacts currently down.
    pub fn active_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// Route a raw primitive to the matching handler.
    pub fn handle(&mut self, event: InputEvent, bus: &mut EventRegistry) {
        match event {
            InputEvent::TouchStart { id, x, y, time } => {
                self.touch_start(id, Vec2::new(x, y), time, bus)
            }
            InputEvent::TouchMove { id, x, y, time } => {
                self.touch_move(id, Vec2::new(x, y), time, bus)
            }
            InputEvent::TouchEnd { id, x, y, time } => {
                self.touch_end(id, Vec2::new(x, y), time, bus)
            }
            InputEvent::TouchCancel { id, time } => self.touch_cancel(id, time, bus),
        }
    }

    pub fn touch_start(&mut self, id: u32, pos: Vec2, time: f64, bus: &mut EventRegistry) {
        self.tick(time, bus);
        if self.contacts.contains_key(&id) {
            log::debug!("gesture: duplicate start for contact {id}, ignored");
            return;
        }

        let point = TouchPoint { id, pos, time };
        let mut contact = Contact {
            start: point,
            current: point,
            long_press: None,
            claimed: false,
        };

        match self.contacts.len() {
            0 => {
                let due = time + self.config.long_press_delay_ms;
                contact.long_press =
                    Some(self.timers.schedule(due, Pending::LongPress { contact: id, due }));
                self.contacts.insert(id, contact);
            }
            1 => {
                contact.claimed = true;
                self.contacts.insert(id, contact);
                self.begin_two_finger(id);
            }
            _ => {
                contact.claimed = true;
                self.contacts.insert(id, contact);
            }
        }
    }

    pub fn touch_move(&mut self, id: u32, pos: Vec2, time: f64, bus: &mut EventRegistry) {
        self.tick(time, bus);
        let Some(contact) = self.contacts.get_mut(&id) else {
            return;
        };
        contact.current = TouchPoint { id, pos, time };

        if self
            .two_finger
            .as_ref()
            .is_some_and(|tf| tf.a == id || tf.b == id)
        {
            self.track_two_finger(time, bus);
            return;
        }

        if contact.claimed {
            return;
        }

        let moved = contact.displacement();
        if moved > self.config.long_press_max_distance {
            if let Some(timer) = contact.long_press.take() {
                self.timers.cancel(timer);
            }
        }

        let elapsed = time - contact.start.time;
        if moved >= self.config.swipe_min_distance && elapsed <= self.config.swipe_max_duration_ms {
            contact.claimed = true;
            let event = swipe_event(contact, time);
            self.emit(event, bus);
        }
    }

    pub fn touch_end(&mut self, id: u32, pos: Vec2, time: f64, bus: &mut EventRegistry) {
        self.tick(time, bus);
        let Some(mut contact) = self.contacts.remove(&id) else {
            log::debug!("gesture: end without start for contact {id}, ignored");
            return;
        };
        contact.current = TouchPoint { id, pos, time };
        if let Some(timer) = contact.long_press.take() {
            self.timers.cancel(timer);
        }

        if self
            .two_finger
            .as_ref()
            .is_some_and(|tf| tf.a == id || tf.b == id)
        {
            self.two_finger = None;
            return;
        }

        if contact.claimed {
            return;
        }

        let elapsed = time - contact.start.time;
        let moved = contact.displacement();
        if moved >= self.config.swipe_min_distance && elapsed <= self.config.swipe_max_duration_ms {
            let event = swipe_event(&contact, time);
            self.emit(event, bus);
        } else if elapsed < self.config.tap_max_duration_ms && moved < self.config.tap_max_distance {
            self.register_tap(contact, time, bus);
        }
    }

    pub fn touch_cancel(&mut self, id: u32, time: f64, bus: &mut EventRegistry) {
        self.tick(time, bus);
        if let Some(contact) = self.contacts.remove(&id) {
            if let Some(timer) = contact.long_press {
                self.timers.cancel(timer);
            }
        }
        if self
            .two_finger
            .as_ref()
            .is_some_and(|tf| tf.a == id || tf.b == id)
        {
            self.two_finger = None;
        }
    }

    /// Fire every timer due at or before `now` (long presses, deferred taps).
    pub fn tick(&mut self, now: f64, bus: &mut EventRegistry) {
        for pending in self.timers.advance(now) {
            match pending {
                Pending::LongPress { contact, due } => self.fire_long_press(contact, due, bus),
                Pending::TapFlush { due } => {
                    if let Some(held) = self.held_tap.take() {
                        let event = GestureEvent {
                            gesture: Gesture::Tap { pos: held.start.pos },
                            points: vec![held.start, held.end],
                            timestamp: due,
                        };
                        self.emit(event, bus);
                    }
                }
            }
        }
    }

    /// Emit a tap still held for the double-tap window right away.
    /// A completed tap is never lost when recognition is interrupted.
    pub fn flush_held_tap(&mut self, now: f64, bus: &mut EventRegistry) {
        let Some(held) = self.held_tap.take() else {
            return;
        };
        self.timers.cancel(held.flush);
        let event = GestureEvent {
            gesture: Gesture::Tap { pos: held.start.pos },
            points: vec![held.start, held.end],
            timestamp: now,
        };
        self.emit(event, bus);
    }

    /// Forget all contacts and pending timers without emitting.
    pub fn reset(&mut self) {
        self.contacts.clear();
        self.timers.clear();
        self.held_tap = None;
        self.two_finger = None;
    }

    fn fire_long_press(&mut self, id: u32, due: f64, bus: &mut EventRegistry) {
        let Some(contact) = self.contacts.get_mut(&id) else {
            return;
        };
        contact.long_press = None;
        if contact.claimed || contact.displacement() > self.config.long_press_max_distance {
            return;
        }
        contact.claimed = true;
        let event = GestureEvent {
            gesture: Gesture::LongPress {
                pos: contact.start.pos,
                held_ms: due - contact.start.time,
            },
            points: vec![contact.start, contact.current],
            timestamp: due,
        };
        self.emit(event, bus);
    }

    fn register_tap(&mut self, contact: Contact, time: f64, bus: &mut EventRegistry) {
        if let Some(held) = self.held_tap.take() {
            let close = contact.start.pos.distance(held.start.pos)
                <= self.config.double_tap_max_distance;
            let within = time - held.end.time < self.config.double_tap_window_ms;
            self.timers.cancel(held.flush);
            if close && within {
                let event = GestureEvent {
                    gesture: Gesture::DoubleTap { pos: held.start.pos },
                    points: vec![held.start, held.end, contact.start, contact.current],
                    timestamp: time,
                };
                self.emit(event, bus);
                return;
            }
            // Not a pair: the first tap stands on its own.
            let event = GestureEvent {
                gesture: Gesture::Tap { pos: held.start.pos },
                points: vec![held.start, held.end],
                timestamp: time,
            };
            self.emit(event, bus);
        }

        let due = time + self.config.double_tap_window_ms;
        let flush = self.timers.schedule(due, Pending::TapFlush { due });
        self.held_tap = Some(HeldTap {
            start: contact.start,
            end: contact.current,
            flush,
        });
    }

    fn begin_two_finger(&mut self, newest: u32) {
        let Some(other) = self.contacts.keys().copied().find(|&k| k != newest) else {
            return;
        };
        // The first finger can no longer become a tap, swipe or long press.
        if let Some(first) = self.contacts.get_mut(&other) {
            first.claimed = true;
            if let Some(timer) = first.long_press.take() {
                self.timers.cancel(timer);
            }
        }
        let (Some(pa), Some(pb)) = (self.contacts.get(&other), self.contacts.get(&newest)) else {
            return;
        };
        let span = pb.current.pos - pa.current.pos;
        self.two_finger = Some(TwoFinger {
            a: other,
            b: newest,
            start_distance: span.length(),
            start_angle: span.y.atan2(span.x),
            last_scale: 1.0,
            last_angle: 0.0,
        });
    }

    fn track_two_finger(&mut self, time: f64, bus: &mut EventRegistry) {
        let Some(tf) = self.two_finger.as_mut() else {
            return;
        };
        let (Some(pa), Some(pb)) = (self.contacts.get(&tf.a), self.contacts.get(&tf.b)) else {
            return;
        };
        let (pa, pb) = (pa.current, pb.current);
        let span = pb.pos - pa.pos;
        let center = (pa.pos + pb.pos) * 0.5;
        let mut out = Vec::new();

        if tf.start_distance > f32::EPSILON {
            let scale = span.length() / tf.start_distance;
            if (scale - tf.last_scale).abs() > self.config.pinch_threshold {
                tf.last_scale = scale;
                let zoom = if scale > 1.0 { Zoom::In } else { Zoom::Out };
                out.push(Gesture::Pinch { scale, center, zoom });
            }
        }

        let angle = wrap_angle(span.y.atan2(span.x) - tf.start_angle);
        if wrap_angle(angle - tf.last_angle).abs() > self.config.rotate_threshold {
            tf.last_angle = angle;
            out.push(Gesture::Rotate { angle, center });
        }

        for gesture in out {
            let event = GestureEvent {
                gesture,
                points: vec![pa, pb],
                timestamp: time,
            };
            self.emit(event, bus);
        }
    }

    fn emit(&mut self, event: GestureEvent, bus: &mut EventRegistry) {
        log::debug!("gesture: {} at {:.0}ms", event.gesture.name(), event.timestamp);
        self.channel.send(event.clone());
        bus.emit(&names::gesture(event.gesture.name()), Event::Gesture(event));
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

fn swipe_event(contact: &Contact, time: f64) -> GestureEvent {
    let delta = contact.current.pos - contact.start.pos;
    let distance = delta.length();
    let elapsed = (time - contact.start.time).max(1.0) as f32;
    GestureEvent {
        gesture: Gesture::Swipe {
            direction: SwipeDirection::from_delta(delta),
            distance,
            velocity: distance / elapsed,
        },
        points: vec![contact.start, contact.current],
        timestamp: time,
    }
}

/// Normalize to (-PI, PI].
fn wrap_angle(a: f32) -> f32 {
    let mut a = a % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GestureRecognizer, Receiver<GestureEvent>, EventRegistry) {
        let mut g = GestureRecognizer::default();
        let rx = g.subscribe();
        (g, rx, EventRegistry::new())
    }

    fn tap(g: &mut GestureRecognizer, bus: &mut EventRegistry, id: u32, pos: Vec2, at: f64) {
        g.touch_start(id, pos, at, bus);
        g.touch_end(id, pos + Vec2::new(2.0, 1.0), at + 80.0, bus);
    }

    fn names_of(events: &[GestureEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.gesture.name()).collect()
    }

    #[test]
    fn single_tap_is_emitted_after_window() {
        let (mut g, rx, mut bus) = setup();
        tap(&mut g, &mut bus, 0, Vec2::new(100.0, 100.0), 0.0);
        assert!(rx.is_empty(), "tap must wait for the double-tap window");
        g.tick(379.0, &mut bus);
        assert!(rx.is_empty());
        g.tick(380.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["tap"]);
        assert_eq!(events[0].timestamp, 380.0);
    }

    #[test]
    fn two_close_taps_collapse_to_one_double_tap() {
        let (mut g, rx, mut bus) = setup();
        tap(&mut g, &mut bus, 0, Vec2::new(100.0, 100.0), 0.0);
        tap(&mut g, &mut bus, 1, Vec2::new(120.0, 110.0), 150.0);
        g.tick(2_000.0, &mut bus);
        assert_eq!(names_of(&rx.drain()), vec!["double_tap"]);
    }

    #[test]
    fn distant_taps_stay_separate() {
        let (mut g, rx, mut bus) = setup();
        tap(&mut g, &mut bus, 0, Vec2::new(0.0, 0.0), 0.0);
        tap(&mut g, &mut bus, 1, Vec2::new(200.0, 0.0), 150.0);
        g.tick(2_000.0, &mut bus);
        assert_eq!(names_of(&rx.drain()), vec!["tap", "tap"]);
    }

    #[test]
    fn slow_taps_stay_separate() {
        let (mut g, rx, mut bus) = setup();
        tap(&mut g, &mut bus, 0, Vec2::new(50.0, 50.0), 0.0);
        tap(&mut g, &mut bus, 1, Vec2::new(50.0, 50.0), 500.0);
        g.tick(2_000.0, &mut bus);
        assert_eq!(names_of(&rx.drain()), vec!["tap", "tap"]);
    }

    #[test]
    fn flushing_emits_held_tap_once() {
        let (mut g, rx, mut bus) = setup();
        tap(&mut g, &mut bus, 0, Vec2::new(100.0, 100.0), 0.0);
        g.flush_held_tap(120.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["tap"]);
        assert_eq!(events[0].timestamp, 120.0);

        g.flush_held_tap(130.0, &mut bus);
        g.tick(2_000.0, &mut bus);
        assert!(rx.is_empty(), "the cancelled flush timer must not fire again");
    }

    #[test]
    fn slow_release_is_not_a_tap() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_end(0, Vec2::ZERO, 250.0, &mut bus);
        g.tick(2_000.0, &mut bus);
        assert!(rx.is_empty());
    }

    #[test]
    fn long_press_fires_after_delay() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::new(10.0, 10.0), 1_000.0, &mut bus);
        g.tick(1_499.0, &mut bus);
        assert!(rx.is_empty());
        g.tick(1_500.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["long_press"]);
        match events[0].gesture {
            Gesture::LongPress { held_ms, .. } => assert_eq!(held_ms, 500.0),
            _ => panic!("expected long press"),
        }
        g.touch_end(0, Vec2::new(10.0, 10.0), 1_700.0, &mut bus);
        g.tick(3_000.0, &mut bus);
        assert!(rx.is_empty(), "release after long press emits nothing");
    }

    #[test]
    fn long_press_cancelled_by_release() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_end(0, Vec2::ZERO, 499.0, &mut bus);
        g.tick(5_000.0, &mut bus);
        assert!(rx.is_empty());
    }

    #[test]
    fn long_press_cancelled_by_movement() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_move(0, Vec2::new(11.0, 0.0), 200.0, &mut bus);
        g.touch_move(0, Vec2::new(0.0, 0.0), 300.0, &mut bus);
        g.tick(1_000.0, &mut bus);
        assert!(rx.is_empty());
    }

    #[test]
    fn long_press_fires_before_late_release_in_same_batch() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        // No tick in between: the release itself advances time past the delay.
        g.touch_end(0, Vec2::ZERO, 800.0, &mut bus);
        assert_eq!(names_of(&rx.drain()), vec!["long_press"]);
    }

    #[test]
    fn fast_horizontal_swipe() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::new(100.0, 100.0), 0.0, &mut bus);
        g.touch_move(0, Vec2::new(130.0, 105.0), 50.0, &mut bus);
        g.touch_move(0, Vec2::new(40.0, 105.0), 100.0, &mut bus);
        g.touch_end(0, Vec2::new(20.0, 105.0), 150.0, &mut bus);
        g.tick(2_000.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["swipe"]);
        match events[0].gesture {
            Gesture::Swipe { direction, distance, velocity } => {
                assert_eq!(direction, SwipeDirection::Left);
                assert!(distance >= 50.0);
                assert!((velocity - distance / 100.0).abs() < 1e-4);
            }
            _ => panic!("expected swipe"),
        }
    }

    #[test]
    fn swipe_detected_on_release() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_end(0, Vec2::new(0.0, -80.0), 120.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["swipe"]);
        assert!(matches!(
            events[0].gesture,
            Gesture::Swipe { direction: SwipeDirection::Up, .. }
        ));
    }

    #[test]
    fn slow_drag_is_not_a_swipe() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_move(0, Vec2::new(30.0, 0.0), 200.0, &mut bus);
        g.touch_end(0, Vec2::new(90.0, 0.0), 600.0, &mut bus);
        g.tick(2_000.0, &mut bus);
        assert!(rx.is_empty());
    }

    #[test]
    fn diagonal_tie_goes_horizontal() {
        assert_eq!(SwipeDirection::from_delta(Vec2::new(60.0, 60.0)), SwipeDirection::Right);
        assert_eq!(SwipeDirection::from_delta(Vec2::new(-60.0, 60.0)), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_delta(Vec2::new(10.0, 60.0)), SwipeDirection::Down);
    }

    #[test]
    fn pinch_ignores_sub_threshold_jitter() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::new(0.0, 0.0), 0.0, &mut bus);
        g.touch_start(1, Vec2::new(100.0, 0.0), 10.0, &mut bus);
        g.touch_move(1, Vec2::new(100.5, 0.0), 20.0, &mut bus);
        assert!(rx.is_empty());
        g.touch_move(1, Vec2::new(150.0, 0.0), 30.0, &mut bus);
        g.touch_move(1, Vec2::new(150.4, 0.0), 40.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["pinch"]);
        match events[0].gesture {
            Gesture::Pinch { scale, center, zoom } => {
                assert!((scale - 1.5).abs() < 1e-4);
                assert_eq!(center, Vec2::new(75.0, 0.0));
                assert_eq!(zoom, Zoom::In);
            }
            _ => panic!("expected pinch"),
        }
    }

    #[test]
    fn pinch_out_and_no_single_finger_gestures() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::new(0.0, 0.0), 0.0, &mut bus);
        g.touch_start(1, Vec2::new(200.0, 0.0), 20.0, &mut bus);
        g.touch_move(1, Vec2::new(100.0, 0.0), 60.0, &mut bus);
        g.touch_end(1, Vec2::new(100.0, 0.0), 80.0, &mut bus);
        g.touch_end(0, Vec2::new(0.0, 0.0), 100.0, &mut bus);
        g.tick(5_000.0, &mut bus);
        let events = rx.drain();
        assert_eq!(names_of(&events), vec!["pinch"]);
        assert!(matches!(events[0].gesture, Gesture::Pinch { zoom: Zoom::Out, .. }));
    }

    #[test]
    fn rotate_reports_relative_angle() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::new(0.0, 0.0), 0.0, &mut bus);
        g.touch_start(1, Vec2::new(100.0, 0.0), 0.0, &mut bus);
        g.touch_move(1, Vec2::new(0.0, 100.0), 50.0, &mut bus);
        let events = rx.drain();
        let angle = events
            .iter()
            .find_map(|e| match e.gesture {
                Gesture::Rotate { angle, .. } => Some(angle),
                _ => None,
            })
            .unwrap();
        assert!((angle - PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let (mut g, rx, mut bus) = setup();
        g.touch_end(9, Vec2::ZERO, 10.0, &mut bus);
        g.touch_move(9, Vec2::ZERO, 20.0, &mut bus);
        g.tick(1_000.0, &mut bus);
        assert!(rx.is_empty());
        assert_eq!(g.active_contacts(), 0);
    }

    #[test]
    fn cancel_drops_contact_silently() {
        let (mut g, rx, mut bus) = setup();
        g.touch_start(0, Vec2::ZERO, 0.0, &mut bus);
        g.touch_cancel(0, 100.0, &mut bus);
        g.tick(1_000.0, &mut bus);
        assert!(rx.is_empty());
    }

    #[test]
    fn rebroadcasts_on_typed_registry_stream() {
        let (mut g, _rx, mut bus) = setup();
        let double = bus.stream("gesture:double_tap");
        let single = bus.stream("gesture:tap");
        tap(&mut g, &mut bus, 0, Vec2::new(5.0, 5.0), 0.0);
        tap(&mut g, &mut bus, 1, Vec2::new(5.0, 5.0), 120.0);
        g.tick(1_000.0, &mut bus);
        assert_eq!(double.len(), 1);
        assert!(single.is_empty());
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
    }
}
