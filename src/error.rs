//! Error types for valuegroups.
//!
//! The group registry itself never fails: unknown groups read as empty and
//! duplicate registrations are ignored. Errors only arise at the edges, when a
//! settings value is read from or written to its store, or when a stream
//! subscriber polls an empty or closed queue.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned when receiving from a [`GroupStream`](crate::stream::GroupStream).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("No change event is currently queued")]
    Empty,

    #[error("Stream for group '{group}' is disconnected")]
    Disconnected {
        group: String,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum GroupsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result type alias for store-facing operations.
pub type Result<T> = std::result::Result<T, GroupsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_converts_into_top_level() {
        let err: GroupsError = StorageError::Decode {
            key: "theme".to_string(),
            message: "expected a string".to_string(),
        }
        .into();
        assert!(matches!(err, GroupsError::Storage(StorageError::Decode { .. })));
        assert_eq!(
            err.to_string(),
            "Stored value for key 'theme' has an unexpected shape: expected a string"
        );
    }

    #[test]
    fn stream_error_converts_into_top_level() {
        let err: GroupsError = StreamError::Disconnected {
            group: "alarm".to_string(),
        }
        .into();
        assert!(matches!(err, GroupsError::Stream(StreamError::Disconnected { .. })));
        assert_eq!(err.to_string(), "Stream for group 'alarm' is disconnected");
    }
}
