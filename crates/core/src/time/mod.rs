mod monotonic;
mod traits;

pub use monotonic::{LocalTimeProvider, MonotonicTimeProvider, SystemClock};
pub use traits::TimeProvider;
