//! Row to record conversion.

use std::marker::PhantomData;

use sqlx::{ColumnIndex, Decode, Row, Type};
use storage_lock_core::{LockInformation, LockRecord, Result, StorageError};

use crate::error::map_column_error;

/// Converts one result row into a record.
pub trait RowDecoder<R>: Send + Sync {
    type Record;

    fn decode(&self, row: &R) -> Result<Self::Record>;
}

/// Column names the lock table is read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockColumns {
    pub lock_id: String,
    pub owner_id: String,
    pub version: String,
    pub information: String,
}

impl Default for LockColumns {
    fn default() -> Self {
        Self {
            lock_id: "lock_id".to_string(),
            owner_id: "owner_id".to_string(),
            version: "version".to_string(),
            information: "lock_information_json_string".to_string(),
        }
    }
}

/// Decodes lock rows into [`LockRecord`]s.
///
/// Expected columns (see [`LockColumns`]): lock_id, owner_id, version,
/// lock_information_json_string
///
/// The owner and version columns must agree with the JSON payload; a row
/// where they differ is reported as a decode error rather than trusted.
#[derive(Debug, Clone, Default)]
pub struct LockRecordDecoder {
    columns: LockColumns,
}

impl LockRecordDecoder {
    pub fn with_columns(columns: LockColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &LockColumns {
        &self.columns
    }
}

fn column<'r, R, T>(row: &'r R, name: &str) -> Result<T>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    T: Decode<'r, R::Database> + Type<R::Database>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| map_column_error(e, name))
}

impl<R> RowDecoder<R> for LockRecordDecoder
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
{
    type Record = LockRecord;

    fn decode(&self, row: &R) -> Result<LockRecord> {
        let lock_id: String = column(row, &self.columns.lock_id)?;
        let owner_id: String = column(row, &self.columns.owner_id)?;
        let version: i64 = column(row, &self.columns.version)?;
        let json: String = column(row, &self.columns.information)?;

        let version = u64::try_from(version).map_err(|_| {
            StorageError::Decode(format!("lock {lock_id}: negative version {version}"))
        })?;
        let information = LockInformation::from_json(&json)?;

        if information.owner_id != owner_id {
            return Err(StorageError::Decode(format!(
                "lock {lock_id}: owner column '{owner_id}' disagrees with payload owner '{}'",
                information.owner_id
            )));
        }
        if information.version != version {
            return Err(StorageError::Decode(format!(
                "lock {lock_id}: version column {version} disagrees with payload version {}",
                information.version
            )));
        }

        Ok(LockRecord {
            lock_id,
            owner_id,
            version,
            information,
        })
    }
}

/// Adapts a closure into a [`RowDecoder`].
pub struct DecodeFn<F, T> {
    f: F,
    _record: PhantomData<fn() -> T>,
}

impl<F, T> DecodeFn<F, T> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _record: PhantomData,
        }
    }
}

impl<R, F, T> RowDecoder<R> for DecodeFn<F, T>
where
    F: Fn(&R) -> Result<T> + Send + Sync,
{
    type Record = T;

    fn decode(&self, row: &R) -> Result<T> {
        (self.f)(row)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::any::AnyRow;

    use super::*;
    use crate::test_support::{insert_lock, memory_pool, sample_information};

    async fn decode_single(sql: &str, decoder: &LockRecordDecoder) -> Result<LockRecord> {
        let pool = memory_pool().await;
        let row: AnyRow = sqlx::query(sql).fetch_one(&pool).await.unwrap();
        decoder.decode(&row)
    }

    #[tokio::test]
    async fn test_decodes_lock_row() {
        let pool = memory_pool().await;
        let info = sample_information("worker-1", 4);
        insert_lock(&pool, "orders", &info).await;

        let row: AnyRow = sqlx::query("SELECT * FROM storage_lock")
            .fetch_one(&pool)
            .await
            .unwrap();
        let record = LockRecordDecoder::default().decode(&row).unwrap();

        assert_eq!(
            record,
            LockRecord {
                lock_id: "orders".to_string(),
                owner_id: "worker-1".to_string(),
                version: 4,
                information: info,
            }
        );
    }

    #[tokio::test]
    async fn test_custom_column_names() {
        let json = sample_information("worker-2", 1).to_json().unwrap();
        let sql = format!(
            "SELECT 'jobs' AS id, 'worker-2' AS owner, 1 AS ver, '{json}' AS payload"
        );
        let decoder = LockRecordDecoder::with_columns(LockColumns {
            lock_id: "id".to_string(),
            owner_id: "owner".to_string(),
            version: "ver".to_string(),
            information: "payload".to_string(),
        });

        let record = decode_single(&sql, &decoder).await.unwrap();

        assert_eq!(record.lock_id, "jobs");
        assert_eq!(record.information.owner_id, "worker-2");
    }

    #[tokio::test]
    async fn test_missing_column_is_decode_error() {
        let result = decode_single(
            "SELECT 'orders' AS lock_id, 'worker-1' AS owner_id, 1 AS version",
            &LockRecordDecoder::default(),
        )
        .await;

        assert_eq!(
            result,
            Err(StorageError::Decode(
                "column 'lock_information_json_string' not found".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let result = decode_single(
            "SELECT 'orders' AS lock_id, 'worker-1' AS owner_id, 1 AS version, \
             '{not json' AS lock_information_json_string",
            &LockRecordDecoder::default(),
        )
        .await;

        assert!(matches!(result, Err(StorageError::Decode(msg)) if msg.starts_with("invalid lock information")));
    }

    #[tokio::test]
    async fn test_negative_version_is_decode_error() {
        let json = sample_information("worker-1", 1).to_json().unwrap();
        let sql = format!(
            "SELECT 'orders' AS lock_id, 'worker-1' AS owner_id, -1 AS version, \
             '{json}' AS lock_information_json_string"
        );

        let result = decode_single(&sql, &LockRecordDecoder::default()).await;

        assert_eq!(
            result,
            Err(StorageError::Decode(
                "lock orders: negative version -1".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_version_mismatch_is_decode_error() {
        let json = sample_information("worker-1", 2).to_json().unwrap();
        let sql = format!(
            "SELECT 'orders' AS lock_id, 'worker-1' AS owner_id, 3 AS version, \
             '{json}' AS lock_information_json_string"
        );

        let result = decode_single(&sql, &LockRecordDecoder::default()).await;

        assert!(matches!(result, Err(StorageError::Decode(msg)) if msg.contains("disagrees")));
    }

    #[tokio::test]
    async fn test_owner_mismatch_is_decode_error() {
        let json = sample_information("worker-1", 1).to_json().unwrap();
        let sql = format!(
            "SELECT 'orders' AS lock_id, 'intruder' AS owner_id, 1 AS version, \
             '{json}' AS lock_information_json_string"
        );

        let result = decode_single(&sql, &LockRecordDecoder::default()).await;

        assert!(matches!(result, Err(StorageError::Decode(msg)) if msg.contains("intruder")));
    }

    #[tokio::test]
    async fn test_decode_fn_wraps_closure() {
        let pool = memory_pool().await;
        let row: AnyRow = sqlx::query("SELECT 'orders' AS lock_id")
            .fetch_one(&pool)
            .await
            .unwrap();

        let decoder = DecodeFn::new(|row: &AnyRow| column::<_, String>(row, "lock_id"));

        assert_eq!(decoder.decode(&row).unwrap(), "orders");
    }
}
