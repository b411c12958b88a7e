//! Group registry: membership bookkeeping and change fan-out.
//!
//! A [`GroupRegistry`] tracks which settings belong to which named groups and
//! which observers are interested in each group. Settings wrappers report
//! mutations through [`GroupRegistry::value_changed`]; the registry forwards the
//! event to every observer of every group the changed key belongs to.
//!
//! The registry is an explicit context object. Clones share state, so one
//! instance can be handed to every settings value and every subscriber, while
//! separately constructed registries are fully isolated from each other.
//!
//! Execution is single-threaded and synchronous. Observers run on the caller's
//! stack inside `value_changed`, and no internal borrow is held while they run:
//! an observer may register values, subscribe, cancel, or report another change.
//! Recursion depth is the caller's responsibility.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::handle::ValueHandle;

/// Unique identifier for one observer registration.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Observer = Rc<dyn Fn(&ValueHandle, &str)>;

struct ObserverEntry {
    id: SubscriptionId,
    callback: Observer,
    /// Cleared on removal; shared with in-flight fan-out snapshots.
    active: Rc<Cell<bool>>,
}

#[derive(Default)]
struct RegistryState {
    /// group name -> member handles, in registration order
    group_values: HashMap<String, Vec<ValueHandle>>,
    /// value key -> group names, in registration order
    key_groups: HashMap<String, Vec<String>>,
    /// group name -> observers, in subscription order
    observers: HashMap<String, Vec<ObserverEntry>>,
}

impl RegistryState {
    fn is_subscribed(&self, group: &str, id: SubscriptionId) -> bool {
        self.observers
            .get(group)
            .is_some_and(|list| list.iter().any(|e| e.id == id))
    }

    fn remove_observer(&mut self, group: &str, id: SubscriptionId) -> bool {
        let Some(list) = self.observers.get_mut(group) else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = list.remove(pos);
        entry.active.set(false);
        if list.is_empty() {
            self.observers.remove(group);
        }
        true
    }
}

/// Registry of group memberships and group observers.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use valuegroups::{group_names, GroupRegistry, ValueHandle};
///
/// let registry = GroupRegistry::new();
/// let theme = ValueHandle::new("theme");
/// registry.add_value(&theme, group_names::WATCH_SYNC);
///
/// let hits = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&hits);
/// let token = registry.observe_changes(group_names::WATCH_SYNC, move |_, _| {
///     seen.set(seen.get() + 1);
/// });
///
/// registry.value_changed(&theme);
/// token.cancel();
/// registry.value_changed(&theme);
///
/// assert_eq!(hits.get(), 1);
/// ```
#[derive(Clone, Default)]
pub struct GroupRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl GroupRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles registered to `group`, in registration order.
    ///
    /// Returns `None` if nothing was ever added to the group.
    #[must_use]
    pub fn values_in_group(&self, group: &str) -> Option<Vec<ValueHandle>> {
        self.state.borrow().group_values.get(group).cloned()
    }

    /// Register `handle` as a member of `group`.
    ///
    /// Adding the same key to the same group again is a no-op.
    pub fn add_value(&self, handle: &ValueHandle, group: &str) {
        let mut state = self.state.borrow_mut();

        let groups = state.key_groups.entry(handle.key().to_string()).or_default();
        if groups.iter().any(|g| g == group) {
            trace!(key = handle.key(), group, "value already in group");
            return;
        }
        groups.push(group.to_string());

        state
            .group_values
            .entry(group.to_string())
            .or_default()
            .push(handle.clone());

        debug!(key = handle.key(), group, "value added to group");
    }

    /// Register `callback` to run whenever any member of `group` changes.
    ///
    /// The callback receives the changed handle and the group name. Dropping
    /// the returned token leaves the observer registered; call
    /// [`ObservationToken::cancel`] to remove it.
    pub fn observe_changes<F>(&self, group: &str, callback: F) -> ObservationToken
    where
        F: Fn(&ValueHandle, &str) + 'static,
    {
        let id = SubscriptionId::new();
        self.state
            .borrow_mut()
            .observers
            .entry(group.to_string())
            .or_default()
            .push(ObserverEntry {
                id,
                callback: Rc::new(callback),
                active: Rc::new(Cell::new(true)),
            });

        debug!(group, subscription = %id, "observer registered");

        ObservationToken {
            id,
            group: group.to_string(),
            state: Rc::downgrade(&self.state),
        }
    }

    /// Notify observers that the value behind `handle` changed.
    ///
    /// Groups are visited in the order the key joined them; within a group,
    /// observers run in subscription order. A key with no groups, or a group
    /// with no observers, produces no calls.
    pub fn value_changed(&self, handle: &ValueHandle) {
        let groups = self.state.borrow().key_groups.get(handle.key()).cloned();
        let Some(groups) = groups else {
            trace!(key = handle.key(), "changed value belongs to no group");
            return;
        };

        for group in &groups {
            self.notify(handle, group);
        }
    }

    fn notify(&self, handle: &ValueHandle, group: &str) {
        // Snapshot so observers can mutate the registry while we iterate.
        let snapshot: Vec<(Rc<Cell<bool>>, Observer)> = {
            let state = self.state.borrow();
            let Some(list) = state.observers.get(group) else {
                return;
            };
            list.iter()
                .map(|e| (Rc::clone(&e.active), Rc::clone(&e.callback)))
                .collect()
        };

        trace!(key = handle.key(), group, observers = snapshot.len(), "fan-out");

        for (active, callback) in snapshot {
            // Skip observers cancelled by an earlier callback in this pass.
            if !active.get() {
                continue;
            }
            callback(handle, group);
        }
    }

    /// Groups `key` belongs to, in the order it joined them.
    #[must_use]
    pub fn groups_of(&self, key: &str) -> Vec<String> {
        self.state
            .borrow()
            .key_groups
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `key` is a member of `group`.
    #[must_use]
    pub fn is_member(&self, key: &str, group: &str) -> bool {
        self.state
            .borrow()
            .key_groups
            .get(key)
            .is_some_and(|groups| groups.iter().any(|g| g == group))
    }

    /// Number of active observers on `group`.
    #[must_use]
    pub fn observer_count(&self, group: &str) -> usize {
        self.state.borrow().observers.get(group).map_or(0, Vec::len)
    }
}

impl fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("GroupRegistry")
            .field("groups", &state.group_values.len())
            .field("keys", &state.key_groups.len())
            .field(
                "observers",
                &state.observers.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

/// Cancellation handle for an observer registered with
/// [`GroupRegistry::observe_changes`].
#[derive(Debug, Clone)]
pub struct ObservationToken {
    id: SubscriptionId,
    group: String,
    state: Weak<RefCell<RegistryState>>,
}

impl ObservationToken {
    /// The subscription id backing this token.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.id
    }

    /// The group this observer listens to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Whether the observer is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.borrow().is_subscribed(&self.group, self.id))
    }

    /// Remove this observer from its group.
    ///
    /// Idempotent. Returns `true` only for the call that actually removed the
    /// observer; later calls, or calls after the registry is gone, return `false`.
    pub fn cancel(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let removed = state.borrow_mut().remove_observer(&self.group, self.id);
        if removed {
            debug!(group = %self.group, subscription = %self.id, "observer cancelled");
        }
        removed
    }
}
