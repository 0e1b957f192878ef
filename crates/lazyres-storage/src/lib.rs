//! Deferred computations with at-most-once evaluation.
//!
//! Every lazy artifact of the resolution engine is one of three cells:
//!
//! - [`LazyValue`]: computed on first read, then permanent. A reentrant read
//!   from the computing thread is an error ([`RecursionDetected`]).
//! - [`RecursionTolerantLazyValue`]: like `LazyValue`, but a reentrant read
//!   from the computing thread receives a provisional fallback that is never
//!   cached, and an optional post-compute hook fixes the value up before it is
//!   published.
//! - [`MemoizedFunction`]: one `LazyValue` per key, so unrelated keys compute
//!   in parallel and a key is computed at most once.
//!
//! Failed computations are never cached: the cell returns to the
//! not-computed state and the next read retries.

mod cell;
mod error;
mod lazy_value;
mod memoized;

pub use error::RecursionDetected;
pub use lazy_value::{LazyValue, RecursionTolerantLazyValue};
pub use memoized::MemoizedFunction;
