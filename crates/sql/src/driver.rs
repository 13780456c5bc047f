//! Database drivers reachable through the sqlx `Any` driver.

use std::fmt;
use std::str::FromStr;

use storage_lock_core::{Result, StorageError};
use url::Url;

/// A database driver selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Sqlite,
    Postgres,
    MySql,
}

impl Driver {
    /// The canonical driver name.
    pub fn name(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
        }
    }

    /// URL schemes a DSN for this driver may use.
    pub fn schemes(&self) -> &'static [&'static str] {
        match self {
            Driver::Sqlite => &["sqlite"],
            Driver::Postgres => &["postgres", "postgresql"],
            Driver::MySql => &["mysql", "mariadb"],
        }
    }

    /// Whether support for this driver was compiled in.
    pub fn is_available(&self) -> bool {
        match self {
            Driver::Sqlite => cfg!(feature = "sqlite"),
            Driver::Postgres => cfg!(feature = "postgres"),
            Driver::MySql => cfg!(feature = "mysql"),
        }
    }

    /// A query returning the server's current time as epoch milliseconds in a
    /// single BIGINT column.
    pub fn now_millis_query(&self) -> &'static str {
        match self {
            Driver::Sqlite => {
                "SELECT CAST((julianday('now') - 2440587.5) * 86400000.0 AS INTEGER)"
            }
            Driver::Postgres => "SELECT CAST(EXTRACT(EPOCH FROM clock_timestamp()) * 1000 AS BIGINT)",
            Driver::MySql => "SELECT CAST(UNIX_TIMESTAMP(NOW(3)) * 1000 AS SIGNED)",
        }
    }

    /// Checks that `dsn` is a URL whose scheme belongs to this driver.
    ///
    /// This is the same parse the sqlx `Any` driver applies when the pool is
    /// built, so a DSN it would refuse fails here with a clearer message.
    pub fn validate_dsn(&self, dsn: &str) -> Result<()> {
        if !self.is_available() {
            return Err(StorageError::Creation(format!(
                "driver '{self}' is not compiled in; enable the '{self}' feature"
            )));
        }

        let url = Url::parse(dsn)
            .map_err(|e| StorageError::Creation(format!("invalid DSN for {self}: {e}")))?;

        if !self.schemes().contains(&url.scheme()) {
            return Err(StorageError::Creation(format!(
                "DSN scheme '{}' does not match driver '{self}'",
                url.scheme()
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Driver {
    type Err = StorageError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            "postgres" | "postgresql" | "pgx" => Ok(Driver::Postgres),
            "mysql" | "mariadb" => Ok(Driver::MySql),
            _ => Err(StorageError::Creation(format!("unknown driver: {name}"))),
        }
    }
}
