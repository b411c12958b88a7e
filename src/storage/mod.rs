//! Settings store seam.
//!
//! The registry never touches stored values. Settings wrappers read and write
//! through a [`SettingsStore`] and then report changes to the registry.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{SettingsStore, StorageError};
