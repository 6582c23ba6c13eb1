//! Browser storage as a `KeyValueStore`

use wasm_bindgen::JsValue;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// localStorage or sessionStorage; unavailable storage fails every call
#[derive(Debug, Clone)]
pub struct BrowserStore {
    inner: Option<web_sys::Storage>,
}

impl BrowserStore {
    /// Persistent, per-origin store
    pub fn local() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("localStorage unavailable - edits will not persist");
        }
        Self { inner }
    }

    /// Tab-lifetime store
    pub fn session() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("sessionStorage unavailable - edit mode cannot be entered");
        }
        Self { inner }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
        self.inner
            .as_ref()
            .ok_or_else(|| StoreError::Backend("storage unavailable".to_string()))
    }
}

fn js_error(e: JsValue) -> StoreError {
    StoreError::Backend(format!("{:?}", e))
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}
