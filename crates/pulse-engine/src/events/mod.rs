pub mod channel;
pub mod derived;
pub mod event;
pub mod registry;

pub use channel::{Channel, Receiver};
pub use derived::{Crossing, DoubleTrigger, StreakCounter, ThresholdMonitor};
pub use event::{names, Event, EventKind};
pub use registry::EventRegistry;
