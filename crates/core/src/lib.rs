//! Storage access abstractions for a SQL-backed distributed lock.
//!
//! The lock engine only talks to storage through the traits in this crate:
//! [`ConnectionManager`] to obtain a database handle and [`TimeProvider`] to
//! read "now" when comparing lease deadlines. Concrete implementations live in
//! `storage_lock_sql`.

pub mod context;
pub mod storage;
pub mod time;

pub use context::{CancelReason, Context};
pub use storage::{
    ConnectionManager, LazyConnection, LazyState, LockInformation, LockRecord, Result,
    StorageError,
};
pub use time::{LocalTimeProvider, MonotonicTimeProvider, SystemClock, TimeProvider};
