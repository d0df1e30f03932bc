use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

#[derive(Debug)]
struct Inbox<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Single-threaded broadcast pipe.
///
/// One producer, any number of `Receiver`s. Every `send` clones the value into
/// each live receiver's FIFO inbox. There is no replay: a receiver only sees
/// values sent after it subscribed, and a send with no receivers is dropped.
#[derive(Debug)]
pub struct Channel<T> {
    receivers: Vec<Weak<RefCell<Inbox<T>>>>,
    closed: bool,
}

/// Subscriber end of a `Channel`. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Receiver<T> {
    inbox: Rc<RefCell<Inbox<T>>>,
}

impl<T: Clone> Channel<T> {
    pub fn new() -> Self {
        Self {
            receivers: Vec::new(),
            closed: false,
        }
    }

    /// Attach a new receiver. Subscribing to a closed channel yields a closed receiver.
    pub fn subscribe(&mut self) -> Receiver<T> {
        let inbox = Rc::new(RefCell::new(Inbox {
            queue: VecDeque::new(),
            closed: self.closed,
        }));
        if !self.closed {
            self.receivers.push(Rc::downgrade(&inbox));
        }
        Receiver { inbox }
    }

    /// Deliver `value` to every live receiver. Returns how many received it.
    pub fn send(&mut self, value: T) -> usize {
        if self.closed {
            return 0;
        }
        self.receivers.retain(|weak| weak.strong_count() > 0);
        let mut delivered = 0;
        for weak in &self.receivers {
            if let Some(inbox) = weak.upgrade() {
                inbox.borrow_mut().queue.push_back(value.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Close the channel. Receivers keep already-queued values but see `is_closed`.
    pub fn close(&mut self) {
        self.closed = true;
        for weak in self.receivers.drain(..) {
            if let Some(inbox) = weak.upgrade() {
                inbox.borrow_mut().closed = true;
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of receivers still alive.
    pub fn receiver_count(&self) -> usize {
        self.receivers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T: Clone> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Receiver<T> {
    /// Pop the oldest queued value.
    pub fn try_recv(&self) -> Option<T> {
        self.inbox.borrow_mut().queue.pop_front()
    }

    /// Take everything queued, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.inbox.borrow_mut().queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inbox.borrow().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.borrow().queue.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.borrow().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_out_preserves_order() {
        let mut ch = Channel::new();
        let a = ch.subscribe();
        let b = ch.subscribe();
        assert_eq!(ch.send(1), 2);
        assert_eq!(ch.send(2), 2);
        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.try_recv(), Some(1));
        assert_eq!(b.try_recv(), Some(2));
        assert_eq!(b.try_recv(), None);
    }

    #[test]
    fn send_without_receivers_is_dropped() {
        let mut ch = Channel::new();
        assert_eq!(ch.send("lost"), 0);
        let late = ch.subscribe();
        assert!(late.is_empty());
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let mut ch = Channel::new();
        let keep = ch.subscribe();
        {
            let _gone = ch.subscribe();
            assert_eq!(ch.receiver_count(), 2);
        }
        assert_eq!(ch.send(7), 1);
        assert_eq!(ch.receiver_count(), 1);
        assert_eq!(keep.len(), 1);
    }

    #[test]
    fn close_marks_receivers_and_rejects_sends() {
        let mut ch = Channel::new();
        let rx = ch.subscribe();
        ch.send(1);
        ch.close();
        assert!(rx.is_closed());
        assert_eq!(ch.send(2), 0);
        assert_eq!(rx.drain(), vec![1]);
        assert!(ch.subscribe().is_closed());
    }
}
