use serde::{Deserialize, Serialize};

use crate::core::time::Throttle;
use crate::events::{names, Event, EventRegistry};
use super::message::{EmbedMessage, HostMessage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Only accept messages from this origin. `None` accepts any origin.
    pub expected_origin: Option<String>,
    pub heartbeat_interval_ms: f64,
    /// Host counts as gone after this long without a heartbeat.
    pub host_timeout_ms: f64,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            expected_origin: None,
            heartbeat_interval_ms: 5_000.0,
            host_timeout_ms: 15_000.0,
        }
    }
}

/// Parent-frame message endpoint: validates inbound posts, queues outbound ones.
pub struct EmbedChannel {
    config: EmbedConfig,
    heartbeat: Throttle,
    last_host_heartbeat: Option<f64>,
    outbox: Vec<String>,
}

impl EmbedChannel {
    pub fn new(config: EmbedConfig) -> Self {
        let heartbeat = Throttle::new(config.heartbeat_interval_ms);
        Self {
            config,
            heartbeat,
            last_host_heartbeat: None,
            outbox: Vec::new(),
        }
    }

    /// Validate and decode one inbound post. Foreign origins and malformed
    /// payloads are dropped without an error. Accepted messages are forwarded
    /// on `embed:<type>`.
    pub fn receive(
        &mut self,
        origin: &str,
        raw: &str,
        now: f64,
        bus: &mut EventRegistry,
    ) -> Option<HostMessage> {
        if let Some(expected) = &self.config.expected_origin {
            if origin != expected {
                log::debug!("embed: dropped message from origin {origin}");
                return None;
            }
        }
        let msg: HostMessage = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(e) => {
                log::debug!("embed: dropped malformed message: {e}");
                return None;
            }
        };
        if let HostMessage::Heartbeat { .. } = msg {
            self.last_host_heartbeat = Some(now);
        }
        bus.emit(&names::embed(msg.name()), Event::Embed(msg.clone()));
        Some(msg)
    }

    /// Queue an outbound message for the host.
    pub fn send(&mut self, msg: &EmbedMessage) {
        match serde_json::to_string(msg) {
            Ok(json) => self.outbox.push(json),
            Err(e) => log::warn!("embed: could not encode {msg:?}: {e}"),
        }
    }

    /// Emit our heartbeat when due.
    pub fn tick(&mut self, now: f64) {
        if self.heartbeat.try_fire(now) {
            self.send(&EmbedMessage::Heartbeat { timestamp: now });
        }
    }

    /// Whether the host has sent a heartbeat recently.
    pub fn host_alive(&self, now: f64) -> bool {
        self.last_host_heartbeat
            .is_some_and(|last| now - last <= self.config.host_timeout_ms)
    }

    /// Serialized messages waiting to be posted, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }
}

impl Default for EmbedChannel {
    fn default() -> Self {
        Self::new(EmbedConfig::default())
    }
}
