//! Result set adaptation.

mod decoder;
mod iterator;

pub use decoder::{DecodeFn, LockColumns, LockRecordDecoder, RowDecoder};
pub use iterator::{RowStream, SqlRowsIterator};
