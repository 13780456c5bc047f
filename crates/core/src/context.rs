//! Cancellation and deadline propagation.
//!
//! Every blocking operation in this layer accepts a [`Context`]. When the
//! context is cancelled or its deadline passes, the in-flight future is
//! dropped and the call fails with [`StorageError::Cancelled`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::storage::{Result, StorageError};

/// Why a [`Context`] stopped an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The context's token was cancelled.
    Cancelled,
    /// The context's deadline elapsed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Carries a cancellation token and an optional deadline.
///
/// Cloning a context shares its token: cancelling any clone cancels all of
/// them. Use [`Context::child`] to derive a context that can be cancelled on
/// its own.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Returns a copy whose deadline is at most `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a copy whose deadline is at most `deadline`.
    ///
    /// An earlier deadline that is already set is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derives a context that is cancelled with its parent, but can also be
    /// cancelled independently.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context is done, if it is.
    pub fn done_reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done_reason().is_some()
    }

    /// Fails with [`StorageError::Cancelled`] if the context is already done.
    pub fn check(&self) -> Result<()> {
        match self.done_reason() {
            Some(reason) => Err(StorageError::Cancelled(reason)),
            None => Ok(()),
        }
    }

    /// Drives `fut` until it completes or the context is done, whichever comes
    /// first. A losing `fut` is dropped, which cancels its I/O.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StorageError::Cancelled(CancelReason::Cancelled)),
            _ = deadline => Err(StorageError::Cancelled(CancelReason::DeadlineExceeded)),
            result = fut => result,
        }
    }
}
