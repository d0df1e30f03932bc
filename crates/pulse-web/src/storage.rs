use pulse_engine::{SaveConfig, SaveError, SaveManager, SaveStore};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `SaveStore` backed by `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, SaveError> {
        let window = web_sys::window().ok_or_else(|| SaveError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| SaveError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl SaveStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// Save manager over localStorage, for use from `Game::init`.
pub fn local_saves(config: SaveConfig) -> Result<SaveManager<LocalStorageStore>, SaveError> {
    Ok(SaveManager::new(LocalStorageStore::open()?, config))
}

fn js_error(err: JsValue) -> SaveError {
    // QuotaExceededError and SecurityError both land here.
    SaveError::Storage(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
