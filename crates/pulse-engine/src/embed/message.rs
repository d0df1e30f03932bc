use serde::{Deserialize, Serialize};

/// Messages the parent page may post into an embedded game.
/// Wire shape: `{ "type": "<kebab-name>", ...fields }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    Resize { width: f32, height: f32 },
    FullscreenResponse { granted: bool },
    Focus,
    Blur,
    Visibility { visible: bool },
    Theme { theme: String },
    Heartbeat { timestamp: f64 },
}

impl HostMessage {
    pub fn name(&self) -> &'static str {
        match self {
            HostMessage::Resize { .. } => "resize",
            HostMessage::FullscreenResponse { .. } => "fullscreen-response",
            HostMessage::Focus => "focus",
            HostMessage::Blur => "blur",
            HostMessage::Visibility { .. } => "visibility",
            HostMessage::Theme { .. } => "theme",
            HostMessage::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// Messages the game posts to its parent page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EmbedMessage {
    Ready { version: String },
    Resize { width: f32, height: f32 },
    FullscreenRequest,
    Heartbeat { timestamp: f64 },
}
