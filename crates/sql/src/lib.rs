//! sqlx-backed storage access for the storage lock.
//!
//! Implements the traits from `storage_lock_core` on top of sqlx:
//!
//! - connection managers for a single DSN, an existing pool, or a borrowed
//!   host handle
//! - [`SqlRowsIterator`], which turns a row stream into lock records and
//!   releases the cursor when the rows run out
//! - [`DatabaseTimeProvider`], which reads "now" from the database server
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite support in the sqlx `Any` driver
//! - `postgres`: PostgreSQL support
//! - `mysql`: MySQL and MariaDB support

mod config;
mod driver;
mod error;
mod manager;
mod rows;
mod time;

#[cfg(test)]
mod test_support;

pub use config::DsnConfig;
pub use driver::Driver;
pub use manager::{
    BorrowedConnectionManager, DsnConnectionManager, PoolConnectionManager,
    BORROWED_CONNECTION_MANAGER_NAME, DSN_CONNECTION_MANAGER_NAME, POOL_CONNECTION_MANAGER_NAME,
};
pub use rows::{DecodeFn, LockColumns, LockRecordDecoder, RowDecoder, RowStream, SqlRowsIterator};
pub use time::{DatabaseClock, DatabaseTimeProvider};
