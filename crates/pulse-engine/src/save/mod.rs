//! Versioned, hash-checked persistence.

pub mod manager;
pub mod store;

use thiserror::Error;

pub use manager::{checksum, MigrationHook, SaveConfig, SaveEnvelope, SaveManager};
pub use store::{MemoryStore, SaveStore};

/// Error type for save operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Slot not present in the store.
    #[error("not found")]
    NotFound,
    /// The backing store refused the operation (quota, privacy mode...).
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Stored hash does not match the payload.
    #[error("checksum mismatch in slot '{slot}'")]
    Integrity { slot: String },
    #[error("save version {found} incompatible with {expected} and no migration installed")]
    VersionMismatch { found: String, expected: String },
    #[error("migration from {from} failed")]
    Migration { from: String },
}
