//! Abstract settings store trait.
//!
//! A store maps string keys to JSON values. Typed access lives one level up in
//! [`StoredValue`](crate::value::StoredValue), which encodes and decodes with
//! serde. Backends only move raw JSON around.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Value could not be encoded to JSON.
    #[error("Failed to encode value for key '{key}': {message}")]
    Encode {
        key: String,
        message: String,
    },

    /// Stored JSON does not match the requested type.
    #[error("Stored value for key '{key}' has an unexpected shape: {message}")]
    Decode {
        key: String,
        message: String,
    },

    /// Keys must be non-empty.
    #[error("Key cannot be empty")]
    EmptyKey,

    /// Backend error.
    #[error("Store backend error: {0}")]
    BackendError(String),
}

/// Key-value store backing settings values.
///
/// Implementations are used from a single thread; methods take `&self` so a
/// store can be shared behind an `Rc` by every value that reads from it.
pub trait SettingsStore {
    /// Get the raw stored value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Insert or overwrite the value for `key`.
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;

    /// Remove the value for `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Whether a value is stored for `key`.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    /// All stored keys, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
