use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::context::Context;
use crate::storage::{Result, StorageError};

use super::TimeProvider;

/// The local wall clock, with no ordering guarantee of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl TimeProvider for SystemClock {
    async fn get_time(&self, ctx: &Context) -> Result<DateTime<Utc>> {
        ctx.check()?;
        Ok(Utc::now())
    }
}

/// Clamps the readings of another provider so they never go backwards.
///
/// A reading earlier than the latest one handed out is replaced by that
/// latest one.
#[derive(Debug)]
pub struct MonotonicTimeProvider<P> {
    inner: P,
    last: Mutex<Option<DateTime<Utc>>>,
}

/// The local clock, clamped to be non-decreasing.
pub type LocalTimeProvider = MonotonicTimeProvider<SystemClock>;

impl<P> MonotonicTimeProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn clamp(&self, reading: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let mut last = self
            .last
            .lock()
            .map_err(|_| StorageError::ClockUnavailable("clock guard poisoned".to_string()))?;

        let now = match *last {
            Some(previous) if previous > reading => {
                tracing::debug!(
                    %previous,
                    %reading,
                    "Clock reading went backwards, holding previous value"
                );
                previous
            }
            _ => reading,
        };
        *last = Some(now);

        Ok(now)
    }
}

impl Default for LocalTimeProvider {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

#[async_trait]
impl<P: TimeProvider> TimeProvider for MonotonicTimeProvider<P> {
    async fn get_time(&self, ctx: &Context) -> Result<DateTime<Utc>> {
        let reading = self.inner.get_time(ctx).await?;
        self.clamp(reading)
    }
}
