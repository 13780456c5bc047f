use thiserror::Error;

use crate::context::CancelReason;

/// Errors that can occur while accessing lock storage.
///
/// The type is `Clone` so that a sticky creation failure can be replayed to
/// every caller of a lazily initialized connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection creation failed: {0}")]
    Creation(String),
    #[error("Connection release failed: {0}")]
    Release(String),
    #[error("Operation cancelled: {0}")]
    Cancelled(CancelReason),
    #[error("Row decode failed: {0}")]
    Decode(String),
    #[error("Clock unavailable: {0}")]
    ClockUnavailable(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Connection manager has been shut down")]
    Closed,
}

impl StorageError {
    /// Returns true if the error was caused by a cancelled context or an
    /// elapsed deadline.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorageError::Cancelled(_))
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_display() {
        let error = StorageError::Creation("unknown driver: oracle".to_string());
        assert_eq!(
            error.to_string(),
            "Connection creation failed: unknown driver: oracle"
        );
    }

    #[test]
    fn test_release_display() {
        let error = StorageError::Release("pool already closed".to_string());
        assert_eq!(
            error.to_string(),
            "Connection release failed: pool already closed"
        );
    }

    #[test]
    fn test_cancelled_display() {
        let error = StorageError::Cancelled(CancelReason::DeadlineExceeded);
        assert_eq!(error.to_string(), "Operation cancelled: deadline exceeded");
        assert!(error.is_cancelled());
    }

    #[test]
    fn test_decode_display() {
        let error = StorageError::Decode("no current row".to_string());
        assert_eq!(error.to_string(), "Row decode failed: no current row");
        assert!(!error.is_cancelled());
    }

    #[test]
    fn test_clock_unavailable_display() {
        let error = StorageError::ClockUnavailable("ntp timeout".to_string());
        assert_eq!(error.to_string(), "Clock unavailable: ntp timeout");
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(
            StorageError::Closed.to_string(),
            "Connection manager has been shut down"
        );
    }
}
