//! # valuegroups - grouped change notification for settings
//!
//! Settings values tag themselves as members of named groups. Features that
//! care about a whole scope (values mirrored to a watch, values that affect
//! alarms) subscribe to the group instead of to each individual setting, and
//! are told whenever any member changes.
//!
//! ## Core Concepts
//!
//! - **ValueHandle**: Reference to one named setting in an external store
//! - **GroupRegistry**: Membership bookkeeping plus change fan-out
//! - **ObservationToken**: Idempotent cancellation for one observer
//! - **StoredValue**: Typed setting that reports its writes to the registry
//!
//! ## Usage
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use valuegroups::{group_names, GroupRegistry, MemoryStore, StoredValue};
//!
//! let registry = GroupRegistry::new();
//! let store = Rc::new(MemoryStore::new());
//!
//! let theme = StoredValue::new("theme", "dark".to_string(), store, registry.clone())
//!     .in_group(group_names::WATCH_SYNC);
//!
//! let token = registry.observe_changes(group_names::WATCH_SYNC, |handle, group| {
//!     println!("{handle} changed in {group}");
//! });
//!
//! theme.set(&"light".to_string())?;
//! token.cancel();
//! # Ok::<(), valuegroups::GroupsError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handle;
pub mod registry;
pub mod storage;
pub mod stream;
pub mod value;

// Re-export primary types at crate root for convenience
pub use error::{GroupsError, Result, StreamError};
pub use handle::{group_names, ValueHandle};
pub use registry::{GroupRegistry, ObservationToken, SubscriptionId};
pub use storage::{MemoryStore, SettingsStore, StorageError};
pub use stream::{GroupChange, GroupStream, StreamConfig};
pub use value::StoredValue;
