//! Reading "now" from the database server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::AnyPool;
use storage_lock_core::{
    ConnectionManager, Context, MonotonicTimeProvider, Result, StorageError, TimeProvider,
};

use crate::driver::Driver;
use crate::manager::DsnConnectionManager;

/// The database server's clock, read through a connection manager.
///
/// Every lock holder that reads time from the same database agrees on
/// "now", regardless of local clock skew. Readings are not clamped; use
/// [`DatabaseTimeProvider`] for the monotonic version.
#[derive(Debug)]
pub struct DatabaseClock<M> {
    manager: M,
    driver: Driver,
}

/// The database clock, clamped to be non-decreasing.
pub type DatabaseTimeProvider<M> = MonotonicTimeProvider<DatabaseClock<M>>;

impl<M> DatabaseClock<M> {
    /// `driver` must be the backend `manager` connects to; it selects the
    /// SQL used to read the time.
    pub fn new(manager: M, driver: Driver) -> Self {
        Self { manager, driver }
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }
}

impl<M> DatabaseClock<M>
where
    M: ConnectionManager<Connection = AnyPool>,
{
    /// Builds a monotonic provider reading from `manager`.
    pub fn monotonic(manager: M, driver: Driver) -> DatabaseTimeProvider<M> {
        MonotonicTimeProvider::new(Self::new(manager, driver))
    }
}

impl DatabaseClock<DsnConnectionManager> {
    /// Reads time through `manager`, using the driver it is configured with.
    pub fn for_dsn(manager: DsnConnectionManager) -> Result<Self> {
        let driver = manager.driver()?;
        Ok(Self::new(manager, driver))
    }
}

fn unavailable(err: StorageError) -> StorageError {
    match err {
        StorageError::Cancelled(_) | StorageError::ClockUnavailable(_) => err,
        other => StorageError::ClockUnavailable(other.to_string()),
    }
}

#[async_trait]
impl<M> TimeProvider for DatabaseClock<M>
where
    M: ConnectionManager<Connection = AnyPool>,
{
    async fn get_time(&self, ctx: &Context) -> Result<DateTime<Utc>> {
        let pool = self.manager.take(ctx).await.map_err(unavailable)?;

        let reading = ctx
            .run(async {
                sqlx::query_scalar::<_, i64>(self.driver.now_millis_query())
                    .fetch_one(&pool)
                    .await
                    .map_err(|e| StorageError::ClockUnavailable(e.to_string()))
            })
            .await;
        let released = self.manager.release(ctx, pool).await;

        let millis = reading?;
        released?;

        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            StorageError::ClockUnavailable(format!("timestamp out of range: {millis}"))
        })
    }
}
