use std::{env, time::Duration};

/// Connection settings for a [`DsnConnectionManager`](crate::DsnConnectionManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsnConfig {
    /// Driver name, e.g. "sqlite", "postgres" or "mysql" (default: "sqlite")
    pub driver_name: String,
    /// Connection string (default: "sqlite://storage_lock.db")
    pub dsn: String,
    /// Upper bound on pooled connections (default: 10)
    pub max_connections: u32,
    /// Seconds to wait for a free pooled connection (default: 30, never zero)
    pub acquire_timeout_seconds: u64,
}

impl DsnConfig {
    const DEFAULT_DRIVER: &'static str = "sqlite";
    const DEFAULT_DSN: &'static str = "sqlite://storage_lock.db";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_ACQUIRE_TIMEOUT_SECONDS: u64 = 30;

    /// Creates a configuration for the given driver and DSN with default pool
    /// settings.
    pub fn new(driver_name: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            dsn: dsn.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_seconds: Self::DEFAULT_ACQUIRE_TIMEOUT_SECONDS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_LOCK_DRIVER` - Driver name (default: "sqlite")
    /// - `STORAGE_LOCK_DSN` - Connection string (default: "sqlite://storage_lock.db")
    /// - `STORAGE_LOCK_MAX_CONNECTIONS` - Pool size (default: 10)
    /// - `STORAGE_LOCK_ACQUIRE_TIMEOUT_SECONDS` - Pool acquire timeout (default: 30)
    pub fn from_env() -> Self {
        Self {
            driver_name: env::var("STORAGE_LOCK_DRIVER")
                .unwrap_or_else(|_| Self::DEFAULT_DRIVER.to_string()),
            dsn: env::var("STORAGE_LOCK_DSN").unwrap_or_else(|_| Self::DEFAULT_DSN.to_string()),
            max_connections: env::var("STORAGE_LOCK_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(Self::DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_seconds: env::var("STORAGE_LOCK_ACQUIRE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(Self::DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
        }
    }

    /// Get the pool acquire timeout as a Duration, at least one second.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds.max(1))
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

impl Default for DsnConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
