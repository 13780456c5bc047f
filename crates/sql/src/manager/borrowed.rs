//! Connection manager over a handle owned by the host application.

use async_trait::async_trait;
use storage_lock_core::{ConnectionManager, Context, Result, StorageError};

pub const BORROWED_CONNECTION_MANAGER_NAME: &str = "borrowed-connection-manager";

/// Lends out clones of a database handle the host application already owns,
/// such as its own `AnyPool` or `SqlitePool`.
///
/// The host controls the handle's lifecycle, so `release` and `shutdown` do
/// nothing to it beyond honoring the context.
#[derive(Debug, Clone)]
pub struct BorrowedConnectionManager<C> {
    name: String,
    handle: C,
}

impl<C> BorrowedConnectionManager<C> {
    pub fn new(handle: C) -> Self {
        Self {
            name: BORROWED_CONNECTION_MANAGER_NAME.to_string(),
            handle,
        }
    }

    /// Creates a manager with a custom diagnostic name.
    ///
    /// Fails with [`StorageError::Configuration`] if `name` is empty.
    pub fn with_name(name: impl Into<String>, handle: C) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StorageError::Configuration(
                "connection manager name must not be empty".to_string(),
            ));
        }
        Ok(Self { name, handle })
    }

    pub fn handle(&self) -> &C {
        &self.handle
    }
}

#[async_trait]
impl<C> ConnectionManager for BorrowedConnectionManager<C>
where
    C: Clone + Send + Sync,
{
    type Connection = C;

    fn name(&self) -> &str {
        &self.name
    }

    async fn take(&self, ctx: &Context) -> Result<C> {
        ctx.check()?;
        Ok(self.handle.clone())
    }

    async fn release(&self, ctx: &Context, _connection: C) -> Result<()> {
        ctx.check()
    }

    async fn shutdown(&self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        tracing::debug!(
            manager = %self.name,
            "Leaving borrowed connection open for its owner"
        );
        Ok(())
    }
}
