use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Result, StorageError};

/// The lock state persisted as JSON alongside each lock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInformation {
    /// Owner currently holding the lock.
    pub owner_id: String,
    /// Version the row was written at; bumped on every write.
    pub version: u64,
    /// Reentrant acquisition count held by the owner.
    pub lock_count: u64,
    pub lock_begin_time: DateTime<Utc>,
    pub lease_expire_time: DateTime<Utc>,
}

impl LockInformation {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StorageError::Decode(format!("invalid lock information: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StorageError::Decode(format!("unencodable lock information: {e}")))
    }

    /// Returns true once `now` has reached the lease expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.lease_expire_time
    }

    /// Time left on the lease at `now`, zero if it has already expired.
    pub fn remaining_lease(&self, now: DateTime<Utc>) -> Duration {
        (self.lease_expire_time - now).max(Duration::zero())
    }
}

/// One lock row, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    pub lock_id: String,
    pub owner_id: String,
    pub version: u64,
    pub information: LockInformation,
}
