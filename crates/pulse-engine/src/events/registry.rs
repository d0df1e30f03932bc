use std::collections::HashMap;

use super::channel::{Channel, Receiver};
use super::event::{Event, EventKind};

struct Stream {
    channel: Channel<Event>,
    kind: Option<EventKind>,
}

/// Named, lazily created broadcast streams.
///
/// Owned by the `FrameworkContext` and handed to components by `&mut`; there
/// is exactly one per running game. Streams are never closed one by one, only
/// all together by `teardown` at shutdown.
pub struct EventRegistry {
    streams: HashMap<String, Stream>,
    torn_down: bool,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            streams: HashMap::new(),
            torn_down: false,
        }
    }

    /// Subscribe to `name`, creating the stream if it does not exist yet.
    pub fn stream(&mut self, name: &str) -> Receiver<Event> {
        if self.torn_down {
            let mut closed = Channel::new();
            closed.close();
            return closed.subscribe();
        }
        self.streams
            .entry(name.to_string())
            .or_insert_with(|| Stream {
                channel: Channel::new(),
                kind: None,
            })
            .channel
            .subscribe()
    }

    /// Publish `event` to the current subscribers of `name`.
    ///
    /// A name with no stream or no live subscribers swallows the event. The
    /// first event delivered on a name fixes its payload kind; events of a
    /// different kind on that name are dropped.
    pub fn emit(&mut self, name: &str, event: Event) -> usize {
        let Some(stream) = self.streams.get_mut(name) else {
            return 0;
        };
        let kind = event.kind();
        match stream.kind {
            Some(bound) if bound != kind => {
                log::warn!(
                    "dropping {:?} on stream '{}' (bound to {:?})",
                    kind,
                    name,
                    bound
                );
                return 0;
            }
            Some(_) => {}
            None => stream.kind = Some(kind),
        }
        stream.channel.send(event)
    }

    pub fn has_stream(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.streams
            .get(name)
            .map_or(0, |s| s.channel.receiver_count())
    }

    /// Payload kind pinned to `name`, if any event has been delivered on it.
    pub fn bound_kind(&self, name: &str) -> Option<EventKind> {
        self.streams.get(name).and_then(|s| s.kind)
    }

    /// Close every stream. Later `stream` calls return closed receivers and
    /// later emits are no-ops.
    pub fn teardown(&mut self) {
        for stream in self.streams.values_mut() {
            stream.channel.close();
        }
        self.streams.clear();
        self.torn_down = true;
        log::debug!("event registry torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_share_one_stream() {
        let mut bus = EventRegistry::new();
        let a = bus.stream("score");
        let b = bus.stream("score");
        assert_eq!(bus.subscriber_count("score"), 2);
        assert_eq!(bus.emit("score", Event::Value(10.0)), 2);
        assert_eq!(a.drain(), vec![Event::Value(10.0)]);
        assert_eq!(b.drain(), vec![Event::Value(10.0)]);
    }

    #[test]
    fn emit_to_unknown_name_is_noop() {
        let mut bus = EventRegistry::new();
        assert_eq!(bus.emit("nobody", Event::Signal), 0);
        assert!(!bus.has_stream("nobody"));
        let rx = bus.stream("nobody");
        assert!(rx.is_empty());
    }

    #[test]
    fn emission_order_is_fifo() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream("hp");
        for v in [3.0, 1.0, 2.0] {
            bus.emit("hp", Event::Value(v));
        }
        assert_eq!(
            rx.drain(),
            vec![Event::Value(3.0), Event::Value(1.0), Event::Value(2.0)]
        );
    }

    #[test]
    fn payload_kind_is_pinned_per_name() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream("hp");
        bus.emit("hp", Event::Value(5.0));
        assert_eq!(bus.bound_kind("hp"), Some(EventKind::Value));
        assert_eq!(bus.emit("hp", Event::Signal), 0);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn teardown_closes_everything() {
        let mut bus = EventRegistry::new();
        let rx = bus.stream("a");
        bus.teardown();
        assert!(rx.is_closed());
        assert_eq!(bus.emit("a", Event::Signal), 0);
        assert!(bus.stream("b").is_closed());
        assert!(bus.is_torn_down());
    }
}
