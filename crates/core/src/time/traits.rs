use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::context::Context;
use crate::storage::Result;

/// A source of "now" for lease expiry comparisons.
///
/// Calendar accuracy is not required. What matters is that readings never go
/// backwards: a call must not return a value earlier than one returned before
/// it. Wrap a raw clock in [`MonotonicTimeProvider`](super::MonotonicTimeProvider)
/// to get that guarantee.
#[async_trait]
pub trait TimeProvider: Send + Sync {
    /// Reads the current time.
    ///
    /// Fails with [`StorageError::ClockUnavailable`](crate::StorageError::ClockUnavailable)
    /// when the underlying clock cannot be read.
    async fn get_time(&self, ctx: &Context) -> Result<DateTime<Utc>>;
}

#[async_trait]
impl<P> TimeProvider for Arc<P>
where
    P: TimeProvider + ?Sized,
{
    async fn get_time(&self, ctx: &Context) -> Result<DateTime<Utc>> {
        (**self).get_time(ctx).await
    }
}
