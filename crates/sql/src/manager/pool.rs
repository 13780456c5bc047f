//! Connection manager over an existing pool.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Database, Pool};
use storage_lock_core::{ConnectionManager, Context, Result, StorageError};

use crate::error::map_acquire_error;

pub const POOL_CONNECTION_MANAGER_NAME: &str = "pool-connection-manager";

/// Checks individual connections out of a sqlx [`Pool`] and back in.
///
/// `take` waits for a free connection (bounded by the pool's acquire timeout
/// and the context). `release` puts the connection back for reuse.
/// `shutdown` closes the pool and waits for checked-out connections to come
/// back. After shutdown, `take` returns [`StorageError::Closed`] and
/// `release` returns [`StorageError::Release`].
#[derive(Debug)]
pub struct PoolConnectionManager<DB: Database> {
    pool: Pool<DB>,
}

impl<DB: Database> PoolConnectionManager<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

#[async_trait]
impl<DB: Database> ConnectionManager for PoolConnectionManager<DB> {
    type Connection = PoolConnection<DB>;

    fn name(&self) -> &str {
        POOL_CONNECTION_MANAGER_NAME
    }

    async fn take(&self, ctx: &Context) -> Result<PoolConnection<DB>> {
        ctx.run(async { self.pool.acquire().await.map_err(map_acquire_error) })
            .await
    }

    async fn release(&self, ctx: &Context, connection: PoolConnection<DB>) -> Result<()> {
        ctx.check()?;

        if self.pool.is_closed() {
            drop(connection);
            return Err(StorageError::Release("pool already closed".to_string()));
        }

        // Dropping a pooled connection returns it to the pool.
        drop(connection);
        tracing::trace!(idle = self.pool.num_idle(), "Returned connection to pool");
        Ok(())
    }

    async fn shutdown(&self, ctx: &Context) -> Result<()> {
        ctx.run(async {
            self.pool.close().await;
            Ok(())
        })
        .await?;
        tracing::debug!("Closed connection pool");
        Ok(())
    }
}
