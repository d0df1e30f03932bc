use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use super::store::SaveStore;
use super::SaveError;

/// Persisted wrapper around a game's save data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: String,
    /// Milliseconds since the Unix epoch, as supplied by the host.
    pub timestamp: f64,
    /// Kept as the exact serialized bytes so the hash is checked against
    /// what was written, not a re-encoding.
    pub data: Box<RawValue>,
    /// `checksum` of `data`.
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub key_prefix: String,
    /// Semantic version written into every envelope.
    pub version: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            key_prefix: "pulse_save_".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

/// 32-bit rolling string hash (`h = h * 31 + c`), as lowercase hex.
/// Catches corruption, not tampering.
pub fn checksum(payload: &str) -> String {
    let h = payload
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32));
    format!("{h:08x}")
}

fn major(version: &str) -> Option<u64> {
    version.split('.').next()?.trim().parse().ok()
}

/// Rewrites data saved under an older major version. `None` means "give up".
pub type MigrationHook = Box<dyn Fn(&str, Value) -> Option<Value>>;

/// Versioned, hash-checked save slots on top of a `SaveStore`.
pub struct SaveManager<S> {
    store: S,
    config: SaveConfig,
    migrate: Option<MigrationHook>,
}

impl<S: SaveStore> SaveManager<S> {
    pub fn new(store: S, config: SaveConfig) -> Self {
        Self {
            store,
            config,
            migrate: None,
        }
    }

    /// Install the hook run when a save's major version differs from ours.
    pub fn with_migration(mut self, hook: impl Fn(&str, Value) -> Option<Value> + 'static) -> Self {
        self.migrate = Some(Box::new(hook));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn key(&self, slot: &str) -> String {
        format!("{}{}", self.config.key_prefix, slot)
    }

    /// Wrap `data` in an envelope and persist it.
    pub fn save<T: Serialize>(&mut self, slot: &str, data: &T, now: f64) -> Result<(), SaveError> {
        let data = serde_json::to_string(data)?;
        let hash = checksum(&data);
        let data = RawValue::from_string(data)?;
        let envelope = SaveEnvelope {
            version: self.config.version.clone(),
            timestamp: now,
            data,
            hash,
        };
        let raw = serde_json::to_string(&envelope)?;
        let key = self.key(slot);
        self.store.set(&key, &raw)?;
        log::debug!("save: wrote slot '{}' ({} bytes)", slot, raw.len());
        Ok(())
    }

    /// Load with the full error surface.
    pub fn try_load<T: DeserializeOwned>(&self, slot: &str) -> Result<T, SaveError> {
        let raw = self.store.get(&self.key(slot))?.ok_or(SaveError::NotFound)?;
        let envelope: SaveEnvelope = serde_json::from_str(&raw)?;

        if checksum(envelope.data.get()) != envelope.hash {
            return Err(SaveError::Integrity {
                slot: slot.to_string(),
            });
        }

        if major(&envelope.version) == major(&self.config.version) {
            return Ok(serde_json::from_str(envelope.data.get())?);
        }

        let hook = self.migrate.as_ref().ok_or_else(|| SaveError::VersionMismatch {
            found: envelope.version.clone(),
            expected: self.config.version.clone(),
        })?;
        log::info!(
            "save: migrating slot '{}' from {} to {}",
            slot,
            envelope.version,
            self.config.version
        );
        let old: Value = serde_json::from_str(envelope.data.get())?;
        let data = hook(&envelope.version, old).ok_or_else(|| SaveError::Migration {
            from: envelope.version.clone(),
        })?;
        Ok(serde_json::from_value(data)?)
    }

    /// Load a slot, treating anything unusable as "no save".
    pub fn load<T: DeserializeOwned>(&self, slot: &str) -> Option<T> {
        match self.try_load(slot) {
            Ok(data) => Some(data),
            Err(SaveError::NotFound) => None,
            Err(e) => {
                log::warn!("save: slot '{}' unusable: {}", slot, e);
                None
            }
        }
    }

    pub fn has_save(&self, slot: &str) -> bool {
        matches!(self.store.get(&self.key(slot)), Ok(Some(_)))
    }

    pub fn delete(&mut self, slot: &str) -> Result<(), SaveError> {
        let key = self.key(slot);
        self.store.remove(&key)
    }
}
