//! Fixtures shared by the SQL tests.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use storage_lock_core::LockInformation;

const CREATE_LOCK_TABLE: &str = r#"
CREATE TABLE storage_lock (
    lock_id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    version INTEGER NOT NULL,
    lock_information_json_string TEXT NOT NULL
)
"#;

/// A single-connection in-memory SQLite pool with the lock table created.
///
/// One connection means every query sees the same database, and a leaked
/// cursor shows up as a `PoolTimedOut` on the next query.
pub(crate) async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(300))
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(CREATE_LOCK_TABLE).execute(&pool).await.unwrap();
    pool
}

pub(crate) fn sample_information(owner_id: &str, version: u64) -> LockInformation {
    LockInformation {
        owner_id: owner_id.to_string(),
        version,
        lock_count: 1,
        lock_begin_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        lease_expire_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 30).unwrap(),
    }
}

pub(crate) async fn insert_lock(pool: &AnyPool, lock_id: &str, info: &LockInformation) {
    sqlx::query(
        "INSERT INTO storage_lock (lock_id, owner_id, version, lock_information_json_string) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(lock_id)
    .bind(&info.owner_id)
    .bind(info.version as i64)
    .bind(info.to_json().unwrap())
    .execute(pool)
    .await
    .unwrap();
}
