//! One-shot guarded connection initialization.

use std::future::Future;

use tokio::sync::OnceCell;

use crate::context::Context;

use super::Result;

/// Observable state of a [`LazyConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyState {
    /// No caller has completed the open step yet.
    Uninitialized,
    /// The open step produced a connection.
    Ready,
    /// The open step failed. The error is cached.
    Failed,
}

/// A connection that is opened at most once, on first use.
///
/// Both outcomes are cached: every caller after the first sees the same
/// connection or the same error, and the open step is never retried.
/// Concurrent first callers wait for the single attempt to finish.
///
/// If the only caller running the open step is cancelled before it finishes,
/// nothing is cached and the next caller runs it again.
#[derive(Debug)]
pub struct LazyConnection<C> {
    cell: OnceCell<Result<C>>,
}

impl<C> LazyConnection<C> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn state(&self) -> LazyState {
        match self.cell.get() {
            None => LazyState::Uninitialized,
            Some(Ok(_)) => LazyState::Ready,
            Some(Err(_)) => LazyState::Failed,
        }
    }

    /// Returns the cached outcome without triggering the open step.
    pub fn get(&self) -> Option<&Result<C>> {
        self.cell.get()
    }
}

impl<C: Clone> LazyConnection<C> {
    /// Returns the cached connection, running `open` if nobody has yet.
    pub async fn get_or_open<F, Fut>(&self, ctx: &Context, open: F) -> Result<C>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C>>,
    {
        let outcome = ctx
            .run(async { Ok(self.cell.get_or_init(open).await) })
            .await?;
        outcome.clone()
    }
}

impl<C> Default for LazyConnection<C> {
    fn default() -> Self {
        Self::new()
    }
}
