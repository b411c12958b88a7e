//! In-memory settings store.
//!
//! Reference backend for embedded use and tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::storage::traits::{SettingsStore, StorageError};

fn borrow_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("store already borrowed: {context}"))
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        return Err(StorageError::EmptyKey);
    }
    Ok(())
}

/// `BTreeMap`-backed [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `values`.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        Self {
            values: RefCell::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether the store holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        check_key(key)?;
        let values = self.values.try_borrow().map_err(|_| borrow_err("get"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        check_key(key)?;
        let mut values = self.values.try_borrow_mut().map_err(|_| borrow_err("set"))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        check_key(key)?;
        let mut values = self.values.try_borrow_mut().map_err(|_| borrow_err("remove"))?;
        Ok(values.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let values = self.values.try_borrow().map_err(|_| borrow_err("keys"))?;
        Ok(values.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("units").unwrap().is_none());

        store.set("units", json!("mmol")).unwrap();
        assert_eq!(store.get("units").unwrap(), Some(json!("mmol")));
        assert!(store.contains("units").unwrap());

        assert!(store.remove("units").unwrap());
        assert!(!store.remove("units").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::with_values([("b", json!(1)), ("a", json!(2))]);
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn empty_key_is_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(store.set("  ", json!(true)), Err(StorageError::EmptyKey)));
        assert!(matches!(store.get(""), Err(StorageError::EmptyKey)));
    }
}
