mod error;
mod lazy;
mod traits;
mod types;

pub use error::{Result, StorageError};
pub use lazy::{LazyConnection, LazyState};
pub use traits::ConnectionManager;
pub use types::{LockInformation, LockRecord};
