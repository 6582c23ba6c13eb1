//! Key-value persistence
//!
//! Features:
//! - `KeyValueStore` port implemented by the browser's local/session storage
//!   and by `MemoryStore` for tests and native previews
//! - `Storage` typed JSON adapter that never raises on reads
//! - Silent (`set`) and checked (`try_set`) writes

mod memory;

pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// String-keyed, string-valued store
///
/// Methods take `&self`: browser storage is a shared handle, and the
/// in-memory fake uses interior mutability to match.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

/// Typed JSON view over a `KeyValueStore`
#[derive(Debug, Clone)]
pub struct Storage<S> {
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read and deserialize a value
    ///
    /// Missing keys, empty strings, backend failures and malformed JSON all
    /// come back as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable value under {}: {}", key, e);
                None
            }
        }
    }

    /// Read the stored string as-is (no JSON decoding)
    pub fn get_raw(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not read {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize and store a value, swallowing any failure
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value) {
            log::warn!("Dropped write to {}: {}", key, e);
        }
    }

    /// Serialize and store a value, reporting failure
    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set_item(key, &json)
    }

    /// Store a plain string without JSON encoding
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set_item(key, value)
    }

    /// Remove a key, swallowing any failure
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            log::warn!("Could not remove {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Caption {
        caption: String,
    }

    #[test]
    fn test_get_missing_is_none() {
        let storage = Storage::new(MemoryStore::new());
        assert_eq!(storage.get::<Caption>("nope"), None);
    }

    #[test]
    fn test_set_then_get() {
        let storage = Storage::new(MemoryStore::new());
        storage.set("k", &Caption { caption: "Lab retreat".into() });
        assert_eq!(
            storage.get::<Caption>("k"),
            Some(Caption { caption: "Lab retreat".into() })
        );
        assert_eq!(storage.get_raw("k").as_deref(), Some(r#"{"caption":"Lab retreat"}"#));
    }

    #[test]
    fn test_malformed_json_is_none() {
        let store = MemoryStore::new();
        store.set_item("k", "{broken").unwrap();
        let storage = Storage::new(&store);
        assert_eq!(storage.get::<Caption>("k"), None);
        // Raw access still sees the bytes
        assert_eq!(storage.get_raw("k").as_deref(), Some("{broken"));
    }

    #[test]
    fn test_wrong_shape_is_none() {
        let store = MemoryStore::new();
        store.set_item("k", "[1, 2, 3]").unwrap();
        assert_eq!(Storage::new(&store).get::<Caption>("k"), None);
    }

    #[test]
    fn test_quota_exceeded_set_is_silent() {
        let store = MemoryStore::with_quota(8);
        let storage = Storage::new(&store);
        storage.set("k", &Caption { caption: "far too long for the quota".into() });
        assert_eq!(storage.get::<Caption>("k"), None);
    }

    #[test]
    fn test_quota_exceeded_try_set_reports() {
        let store = MemoryStore::with_quota(8);
        let storage = Storage::new(&store);
        let err = storage
            .try_set("k", &Caption { caption: "far too long for the quota".into() })
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_set_replaces_previous() {
        let storage = Storage::new(MemoryStore::new());
        storage.set("k", &vec![1, 2, 3]);
        storage.set("k", &vec![4]);
        assert_eq!(storage.get::<Vec<i32>>("k"), Some(vec![4]));
    }

    #[test]
    fn test_remove() {
        let storage = Storage::new(MemoryStore::new());
        storage.set_raw("flag", "true").unwrap();
        storage.remove("flag");
        assert_eq!(storage.get_raw("flag"), None);
    }
}
