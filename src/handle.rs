//! Value handles and well-known group names.

use std::fmt;
use std::rc::Rc;

/// Reference to one named setting in an external store.
///
/// A handle carries only the key of the underlying value. The registry keeps
/// clones of handles for enumeration but never owns the stored value itself.
///
/// # Examples
///
/// ```
/// use valuegroups::ValueHandle;
///
/// let theme = ValueHandle::new("theme");
/// assert_eq!(theme.key(), "theme");
/// assert_eq!(theme, ValueHandle::new("theme"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueHandle {
    key: Rc<str>,
}

impl ValueHandle {
    /// Create a handle for the given store key.
    pub fn new(key: impl Into<Rc<str>>) -> Self {
        Self { key: key.into() }
    }

    /// The store key this handle refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ValueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<&str> for ValueHandle {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ValueHandle {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Group names recognized across the application.
///
/// Any other string is a valid group name too; these exist so that features
/// agreeing on a scope do not have to repeat the literal.
pub mod group_names {
    /// Settings mirrored to a paired watch.
    pub const WATCH_SYNC: &str = "watchSync";

    /// Settings that affect alarm evaluation.
    pub const ALARM: &str = "alarm";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_key() {
        let a = ValueHandle::new("units");
        let b = ValueHandle::from(String::from("units"));
        let c = ValueHandle::from("theme");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "units");
    }
}
