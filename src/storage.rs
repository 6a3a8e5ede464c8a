use web_sys as web;
use wobble_core::{KeyValueStore, StoreError};

/// `window.localStorage`, or nothing when the browser refuses access
/// (private mode, sandboxed iframe). Reads then see an empty store.
pub struct LocalStore {
    storage: Option<web::Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = web::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("[store] localStorage unavailable; progress will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web::Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage".into()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match &self.storage {
            Some(s) => s
                .get_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e))),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}
