pub mod channel;
pub mod message;

pub use channel::{EmbedChannel, EmbedConfig};
pub use message::{EmbedMessage, HostMessage};
