//! Connection manager for deployments with a single DSN.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use storage_lock_core::{
    ConnectionManager, Context, LazyConnection, LazyState, Result, StorageError,
};

use crate::config::DsnConfig;
use crate::driver::Driver;

pub const DSN_CONNECTION_MANAGER_NAME: &str = "dsn-connection-manager";

/// Opens one [`AnyPool`] from a driver name and DSN on first use and hands
/// that same pool to every caller for the life of the process.
///
/// Opening is lazy and happens at most once, even under concurrent first
/// calls. A failed open is cached: every later [`take`](ConnectionManager::take)
/// returns the same error without retrying, since the parameters cannot
/// change. Opening does not verify connectivity; the pool connects on its
/// first query.
///
/// After [`shutdown`](ConnectionManager::shutdown), `take` returns
/// [`StorageError::Closed`]. A shutdown that runs before any pool was opened
/// seals the manager, so [`state`](Self::state) reports
/// [`LazyState::Failed`] from then on.
#[derive(Debug)]
pub struct DsnConnectionManager {
    config: DsnConfig,
    pool: LazyConnection<AnyPool>,
    shut_down: AtomicBool,
}

impl DsnConnectionManager {
    pub fn new(driver_name: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self::from_config(DsnConfig::new(driver_name, dsn))
    }

    pub fn from_config(config: DsnConfig) -> Self {
        Self {
            config,
            pool: LazyConnection::new(),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn driver_name(&self) -> &str {
        &self.config.driver_name
    }

    pub fn dsn(&self) -> &str {
        &self.config.dsn
    }

    /// Resolves the configured driver name.
    pub fn driver(&self) -> Result<Driver> {
        self.config.driver_name.parse()
    }

    pub fn state(&self) -> LazyState {
        self.pool.state()
    }

    fn open(&self) -> Result<AnyPool> {
        let driver = self.driver()?;
        driver.validate_dsn(&self.config.dsn)?;

        sqlx::any::install_default_drivers();

        AnyPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.acquire_timeout())
            .connect_lazy(&self.config.dsn)
            .map_err(|e| StorageError::Creation(e.to_string()))
    }
}

#[async_trait]
impl ConnectionManager for DsnConnectionManager {
    type Connection = AnyPool;

    fn name(&self) -> &str {
        DSN_CONNECTION_MANAGER_NAME
    }

    async fn take(&self, ctx: &Context) -> Result<AnyPool> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(StorageError::Closed);
        }

        self.pool
            .get_or_open(ctx, || async {
                let outcome = self.open();
                match &outcome {
                    Ok(_) => tracing::debug!(
                        driver = %self.config.driver_name,
                        max_connections = self.config.max_connections,
                        "Opened connection pool"
                    ),
                    Err(error) => tracing::warn!(
                        driver = %self.config.driver_name,
                        %error,
                        "Failed to open connection pool; caching error"
                    ),
                }
                outcome
            })
            .await
    }

    async fn release(&self, ctx: &Context, _connection: AnyPool) -> Result<()> {
        // Every caller shares the one pool, so there is nothing to check in.
        ctx.check()
    }

    async fn shutdown(&self, ctx: &Context) -> Result<()> {
        ctx.check()?;

        // Waits for an open already in flight, or seals the cell so none can
        // start after this point.
        let outcome = self
            .pool
            .get_or_open(ctx, || async { Err(StorageError::Closed) })
            .await;

        match outcome {
            Err(StorageError::Closed) => {
                self.shut_down.store(true, Ordering::Release);
                Ok(())
            }
            // Cancellation, or a failed open that stays the answer for every
            // later call.
            Err(error) => Err(error),
            Ok(pool) => {
                if self.shut_down.swap(true, Ordering::AcqRel) {
                    tracing::debug!("Connection manager already shut down");
                    return Ok(());
                }
                ctx.run(async {
                    pool.close().await;
                    Ok(())
                })
                .await?;
                tracing::debug!(driver = %self.config.driver_name, "Closed connection pool");
                Ok(())
            }
        }
    }
}
