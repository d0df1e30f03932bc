/// Raw pointer/touch primitives as delivered by the browser.
/// Positions are CSS pixels, `time` is the event timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A contact began.
    TouchStart { id: u32, x: f32, y: f32, time: f64 },
    /// A contact moved.
    TouchMove { id: u32, x: f32, y: f32, time: f64 },
    /// A contact lifted.
    TouchEnd { id: u32, x: f32, y: f32, time: f64 },
    /// The browser took the contact away (scroll takeover, palm rejection...).
    TouchCancel { id: u32, time: f64 },
}

impl InputEvent {
    pub fn time(&self) -> f64 {
        match *self {
            InputEvent::TouchStart { time, .. }
            | InputEvent::TouchMove { time, .. }
            | InputEvent::TouchEnd { time, .. }
            | InputEvent::TouchCancel { time, .. } => time,
        }
    }

    pub fn contact(&self) -> u32 {
        match *self {
            InputEvent::TouchStart { id, .. }
            | InputEvent::TouchMove { id, .. }
            | InputEvent::TouchEnd { id, .. }
            | InputEvent::TouchCancel { id, .. } => id,
        }
    }
}

/// A queue of input events.
/// JS writes events into the queue; Rust drains them on the next tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::TouchStart { id: 0, x: 10.0, y: 20.0, time: 1.0 });
        q.push(InputEvent::TouchEnd { id: 0, x: 10.0, y: 20.0, time: 80.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].time(), 80.0);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_carries_contact() {
        let mut q = InputQueue::new();
        q.push(InputEvent::TouchCancel { id: 4, time: 12.5 });
        let events = q.drain();
        assert_eq!(events[0].contact(), 4);
        assert_eq!(events[0].time(), 12.5);
    }
}
