use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use storage_lock_core::{Result, StorageError};

use crate::error::map_stream_error;

use super::decoder::{LockRecordDecoder, RowDecoder};

/// A streaming result set as returned by sqlx's `fetch`.
pub type RowStream<'c, R> = BoxStream<'c, std::result::Result<R, sqlx::Error>>;

/// Presents a streaming result set as a forward-only sequence of records.
///
/// The iterator owns the result stream, and with it the connection the
/// stream is reading from. The stream is dropped as soon as it reports no
/// further rows (or fails), so a loop that runs until
/// [`next`](Self::next) returns `false` never leaks it. A caller that stops
/// early should call [`close`](Self::close); dropping the iterator has the
/// same effect.
///
/// ```rust,ignore
/// let rows = sqlx::query("SELECT * FROM storage_lock").fetch(&pool);
/// let mut iter = SqlRowsIterator::new(rows);
/// while iter.next().await? {
///     let record = iter.value()?;
/// }
/// ```
pub struct SqlRowsIterator<'c, R, D = LockRecordDecoder> {
    cursor: Option<RowStream<'c, R>>,
    current: Option<R>,
    decoder: D,
}

impl<'c, R> SqlRowsIterator<'c, R, LockRecordDecoder> {
    /// Wraps `rows`, decoding them as lock records.
    pub fn new(rows: RowStream<'c, R>) -> Self {
        Self {
            cursor: Some(rows),
            current: None,
            decoder: LockRecordDecoder::default(),
        }
    }
}

impl<'c, R, D> SqlRowsIterator<'c, R, D>
where
    D: RowDecoder<R>,
{
    pub fn with_decoder(rows: RowStream<'c, R>, decoder: D) -> Self {
        Self {
            cursor: Some(rows),
            current: None,
            decoder,
        }
    }

    /// Advances to the next row, returning whether one is available.
    ///
    /// On `false` the cursor has already been closed. A driver error also
    /// closes the cursor before it is returned.
    pub async fn next(&mut self) -> Result<bool> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };

        match cursor.try_next().await {
            Ok(Some(row)) => {
                self.current = Some(row);
                Ok(true)
            }
            Ok(None) => {
                self.close();
                Ok(false)
            }
            Err(err) => {
                self.close();
                Err(map_stream_error(err))
            }
        }
    }

    /// Decodes the row the last successful [`next`](Self::next) moved to.
    pub fn value(&self) -> Result<D::Record> {
        match &self.current {
            Some(row) => self.decoder.decode(row),
            None => Err(StorageError::Decode("no current row".to_string())),
        }
    }

    /// Releases the cursor without reading the remaining rows.
    pub fn close(&mut self) {
        self.current = None;
        if self.cursor.take().is_some() {
            tracing::trace!("Closed result cursor");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }

    /// Reads every remaining row, stopping at the first error.
    pub async fn collect_records(mut self) -> Result<Vec<D::Record>> {
        let mut records = Vec::new();
        while self.next().await? {
            records.push(self.value()?);
        }
        Ok(records)
    }
}
