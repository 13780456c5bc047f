use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;

use super::Result;

/// Manages the connections the lock engine uses to reach storage.
///
/// The lock engine is written against this trait only, so the same engine
/// runs unchanged whether the connection comes from a single DSN, a
/// long-lived pool, or a handle borrowed from the host application.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// The connection handle given out by [`take`](Self::take).
    type Connection: Send;

    /// Identifies the manager in diagnostics. Never empty, never changes.
    fn name(&self) -> &str;

    /// Gets a connection, freshly created or recycled.
    async fn take(&self, ctx: &Context) -> Result<Self::Connection>;

    /// Hands a connection back once the caller is done with it.
    async fn release(&self, ctx: &Context, connection: Self::Connection) -> Result<()>;

    /// Disposes of everything the manager holds.
    ///
    /// The lock engine never calls this. The owning process calls it once
    /// while tearing down.
    async fn shutdown(&self, ctx: &Context) -> Result<()>;
}

#[async_trait]
impl<M> ConnectionManager for Arc<M>
where
    M: ConnectionManager + ?Sized,
{
    type Connection = M::Connection;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn take(&self, ctx: &Context) -> Result<Self::Connection> {
        (**self).take(ctx).await
    }

    async fn release(&self, ctx: &Context, connection: Self::Connection) -> Result<()> {
        (**self).release(ctx, connection).await
    }

    async fn shutdown(&self, ctx: &Context) -> Result<()> {
        (**self).shutdown(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts checkouts so delegation through `Arc` can be observed.
    #[derive(Default)]
    struct CountingManager {
        out: AtomicUsize,
    }

    #[async_trait]
    impl ConnectionManager for CountingManager {
        type Connection = usize;

        fn name(&self) -> &str {
            "counting-connection-manager"
        }

        async fn take(&self, ctx: &Context) -> Result<usize> {
            ctx.check()?;
            Ok(self.out.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn release(&self, ctx: &Context, _connection: usize) -> Result<()> {
            ctx.check()?;
            self.out.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }

        async fn shutdown(&self, _ctx: &Context) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_arc_delegates_to_inner_manager() {
        let manager = Arc::new(CountingManager::default());
        let ctx = Context::background();

        assert_eq!(ConnectionManager::name(&manager), "counting-connection-manager");

        let first = manager.take(&ctx).await.unwrap();
        let second = manager.take(&ctx).await.unwrap();
        assert_eq!((first, second), (1, 2));

        manager.release(&ctx, second).await.unwrap();
        assert_eq!(manager.out.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_manager_usable_as_generic_bound() {
        async fn checkout_twice<M: ConnectionManager>(manager: &M, ctx: &Context) -> Result<()> {
            let connection = manager.take(ctx).await?;
            manager.release(ctx, connection).await?;
            let connection = manager.take(ctx).await?;
            manager.release(ctx, connection).await
        }

        let manager = CountingManager::default();
        checkout_twice(&manager, &Context::background())
            .await
            .unwrap();
        assert_eq!(manager.out.load(Ordering::SeqCst), 0);
    }
}
