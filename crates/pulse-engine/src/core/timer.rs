/// Handle to a scheduled timer, used to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone)]
struct Pending<K> {
    id: TimerId,
    due: f64,
    key: K,
}

/// Cancellable one-shot timers over injected time.
///
/// Nothing fires on its own: the owner calls `advance(now)` from its tick and
/// receives every key whose due time has been reached. Cancelling removes the
/// entry outright, so a stale callback can never run against newer state.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    pending: Vec<Pending<K>>,
    next_id: u32,
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(8),
            next_id: 1,
        }
    }

    /// Schedule `key` to fire at `due` (milliseconds).
    pub fn schedule(&mut self, due: f64, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Pending { id, due, key });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(idx) = self.pending.iter().position(|p| p.id == id) {
            self.pending.remove(idx);
            true
        } else {
            false
        }
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Remove and return every key due at or before `now`.
    /// Ordered by due time; equal due times keep schedule order.
    pub fn advance(&mut self, now: f64) -> Vec<K> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.key).collect()
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due).min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_when_due() {
        let mut timers = TimerQueue::new();
        timers.schedule(500.0, "long_press");
        assert!(timers.advance(499.0).is_empty());
        assert_eq!(timers.advance(500.0), vec!["long_press"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(100.0, 1u8);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(1_000.0).is_empty());
    }

    #[test]
    fn due_order_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300.0, 'c');
        timers.schedule(100.0, 'a');
        timers.schedule(300.0, 'd');
        timers.schedule(200.0, 'b');
        assert_eq!(timers.next_due(), Some(100.0));
        assert_eq!(timers.advance(300.0), vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn partial_advance_keeps_later_timers() {
        let mut timers = TimerQueue::new();
        let early = timers.schedule(10.0, 1);
        let late = timers.schedule(50.0, 2);
        assert_eq!(timers.advance(20.0), vec![1]);
        assert!(!timers.is_pending(early));
        assert!(timers.is_pending(late));
        assert_eq!(timers.len(), 1);
    }
}
