//! In-memory store used by tests and the native preview

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::StoreError;

/// `KeyValueStore` backed by a map, with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
    /// Total bytes (keys + values) allowed, like a browser storage quota
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once `quota` bytes would be exceeded
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }

    /// Load a dump of browser storage: a JSON object mapping keys to values
    ///
    /// String values are stored verbatim; anything else is stored as its JSON
    /// text, which is how the editor itself writes records.
    pub fn from_json_dump(json: &str) -> Result<Self, StoreError> {
        let dump: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let items = dump
            .into_iter()
            .map(|(key, value)| {
                let raw = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, raw)
            })
            .collect();
        Ok(Self {
            items: RefCell::new(items),
            quota: None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::Backend(format!(
                    "quota exceeded ({} of {} bytes)",
                    needed, quota
                )));
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_counts_replacement_once() {
        let store = MemoryStore::with_quota(10);
        store.set_item("k", "12345").unwrap();
        // Replacing the same key frees the old value first
        store.set_item("k", "123456789").unwrap();
        assert!(store.set_item("j", "1").is_err());
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("123456789"));
    }

    #[test]
    fn test_from_json_dump() {
        let store = MemoryStore::from_json_dump(
            r#"{"labSiteName": "Vision Lab", "labPublications": [{"year": "2024", "title": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_item("labSiteName").unwrap().as_deref(), Some("Vision Lab"));
        assert_eq!(
            store.get_item("labPublications").unwrap().as_deref(),
            Some(r#"[{"title":"A","year":"2024"}]"#)
        );
    }

    #[test]
    fn test_from_json_dump_rejects_non_object() {
        assert!(MemoryStore::from_json_dump("[1]").is_err());
    }
}
