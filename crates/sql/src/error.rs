//! sqlx error mapping.
//!
//! Maps `sqlx::Error` to `StorageError` from `storage_lock_core`, picking the
//! error kind from the operation that failed.

use storage_lock_core::StorageError;

/// Maps an error raised while checking a connection out of a pool.
///
/// - `PoolClosed` → `StorageError::Closed`
/// - `PoolTimedOut` → `StorageError::Creation`
/// - All other errors → `StorageError::Creation`
pub(crate) fn map_acquire_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolClosed => StorageError::Closed,
        sqlx::Error::PoolTimedOut => {
            StorageError::Creation("timed out waiting for a pooled connection".to_string())
        }
        _ => StorageError::Creation(err.to_string()),
    }
}

/// Maps an error raised while reading a single column of a row.
pub(crate) fn map_column_error(err: sqlx::Error, column: &str) -> StorageError {
    match err {
        sqlx::Error::ColumnNotFound(_) => {
            StorageError::Decode(format!("column '{column}' not found"))
        }
        _ => StorageError::Decode(format!("column '{column}': {err}")),
    }
}

/// Maps an error raised while a result stream was being read.
pub(crate) fn map_stream_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolClosed => StorageError::Closed,
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StorageError::Decode(err.to_string())
        }
        _ => StorageError::Query(err.to_string()),
    }
}
