//! Typed settings values.
//!
//! A [`StoredValue`] binds a key, a default, a store, and a registry. Writes go
//! to the store first and are then reported to the registry, so observers that
//! read the value back always see the new state.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::error::Result;
use crate::handle::ValueHandle;
use crate::registry::GroupRegistry;
use crate::storage::{SettingsStore, StorageError};

/// A typed setting persisted in a [`SettingsStore`].
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use valuegroups::{group_names, GroupRegistry, MemoryStore, StoredValue};
///
/// let registry = GroupRegistry::new();
/// let store = Rc::new(MemoryStore::new());
///
/// let units = StoredValue::new("units", "mg/dL".to_string(), store, registry.clone())
///     .in_group(group_names::WATCH_SYNC);
///
/// assert_eq!(units.get()?, "mg/dL");
/// units.set(&"mmol/L".to_string())?;
/// assert_eq!(units.get()?, "mmol/L");
/// assert!(registry.is_member("units", group_names::WATCH_SYNC));
/// # Ok::<(), valuegroups::GroupsError>(())
/// ```
pub struct StoredValue<T> {
    handle: ValueHandle,
    default: T,
    store: Rc<dyn SettingsStore>,
    registry: GroupRegistry,
}

impl<T> StoredValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Bind a setting to `key` with a fallback `default`.
    pub fn new(
        key: impl Into<Rc<str>>,
        default: T,
        store: Rc<dyn SettingsStore>,
        registry: GroupRegistry,
    ) -> Self {
        Self {
            handle: ValueHandle::new(key),
            default,
            store,
            registry,
        }
    }

    /// Register this value as a member of `group`.
    #[must_use]
    pub fn in_group(self, group: &str) -> Self {
        self.registry.add_value(&self.handle, group);
        self
    }

    /// Handle passed to group observers when this value changes.
    #[must_use]
    pub const fn handle(&self) -> &ValueHandle {
        &self.handle
    }

    /// Store key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.handle.key()
    }

    /// Value returned by [`get`](Self::get) when nothing is stored.
    #[must_use]
    pub const fn default_value(&self) -> &T {
        &self.default
    }

    /// Current value, or the default if the key is unset.
    pub fn get(&self) -> Result<T> {
        let Some(raw) = self.store.get(self.key())? else {
            return Ok(self.default.clone());
        };
        let value = serde_json::from_value(raw).map_err(|e| StorageError::Decode {
            key: self.key().to_string(),
            message: e.to_string(),
        })?;
        Ok(value)
    }

    /// Write `value` and notify group observers.
    pub fn set(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_value(value).map_err(|e| StorageError::Encode {
            key: self.key().to_string(),
            message: e.to_string(),
        })?;
        self.store.set(self.key(), raw)?;
        trace!(key = self.key(), "stored value updated");

        self.registry.value_changed(&self.handle);
        Ok(())
    }

    /// Remove the stored value so reads fall back to the default.
    ///
    /// Observers are notified only if a value was actually removed.
    pub fn reset(&self) -> Result<()> {
        if self.store.remove(self.key())? {
            trace!(key = self.key(), "stored value reset");
            self.registry.value_changed(&self.handle);
        }
        Ok(())
    }

    /// Whether an explicit value is stored.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.store.contains(self.key())?)
    }
}

impl<T: fmt::Debug> fmt::Debug for StoredValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredValue")
            .field("key", &self.handle.key())
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
