//! Connection manager implementations.
//!
//! - [`DsnConnectionManager`]: opens one pool from a driver name and DSN
//! - [`PoolConnectionManager`]: checks connections out of an existing pool
//! - [`BorrowedConnectionManager`]: lends a handle owned by the host application
//!
//! The owning process picks one at construction time; the lock engine only
//! sees [`ConnectionManager`](storage_lock_core::ConnectionManager).

mod borrowed;
mod dsn;
mod pool;

pub use borrowed::{BorrowedConnectionManager, BORROWED_CONNECTION_MANAGER_NAME};
pub use dsn::{DsnConnectionManager, DSN_CONNECTION_MANAGER_NAME};
pub use pool::{PoolConnectionManager, POOL_CONNECTION_MANAGER_NAME};
