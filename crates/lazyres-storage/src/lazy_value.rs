use crate::cell::{Begin, CellCore};
use crate::error::RecursionDetected;
use std::fmt;

/// A deferred computation evaluated at most once.
///
/// The computation is supplied at the read site, so the cell itself never
/// captures its owner:
///
/// ```ignore
/// self.annotations.get_or_try_init(|| self.compute_annotations(ctx))
/// ```
pub struct LazyValue<T> {
    core: CellCore<T>,
}

impl<T: Clone> LazyValue<T> {
    pub const fn new() -> Self {
        Self {
            core: CellCore::new(),
        }
    }

    /// The published value, if any. Never triggers the computation.
    pub fn get(&self) -> Option<T> {
        self.core.peek()
    }

    pub fn is_computed(&self) -> bool {
        self.core.is_computed()
    }

    /// Return the cached value or run `compute` exactly once.
    ///
    /// Concurrent readers on other threads block until the owner publishes.
    /// A read from inside `compute` on the same thread fails with
    /// [`RecursionDetected`]. Errors from `compute` are returned and not cached.
    pub fn get_or_try_init<E, F>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RecursionDetected>,
    {
        match self.core.begin() {
            Begin::Ready(value) => Ok(value),
            Begin::Reentrant => Err(RecursionDetected {
                value_type: std::any::type_name::<T>(),
            }
            .into()),
            Begin::Owner(guard) => {
                let value = compute()?;
                Ok(guard.publish(value))
            }
        }
    }
}

impl<T: Clone> Default for LazyValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for LazyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core.peek() {
            Some(value) => f.debug_tuple("LazyValue").field(&value).finish(),
            None => f.write_str("LazyValue(<not computed>)"),
        }
    }
}

/// A lazy value that answers reentrant reads with a provisional fallback.
///
/// While the owning thread is inside `compute` or `post_compute`, a read from
/// that same thread returns `on_recursion()` instead of recursing. The
/// fallback is never stored. `post_compute` receives the real value before it
/// is published, so no reader on any thread observes the value before the
/// fix-up has run.
pub struct RecursionTolerantLazyValue<T> {
    core: CellCore<T>,
}

impl<T: Clone> RecursionTolerantLazyValue<T> {
    pub const fn new() -> Self {
        Self {
            core: CellCore::new(),
        }
    }

    pub fn get(&self) -> Option<T> {
        self.core.peek()
    }

    pub fn is_computed(&self) -> bool {
        self.core.is_computed()
    }

    /// True while a computation (or its post-compute hook) is running.
    pub fn is_computing(&self) -> bool {
        self.core.is_computing()
    }

    pub fn get_or_try_init<E, F, R>(&self, compute: F, on_recursion: R) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        R: FnOnce() -> T,
    {
        self.get_or_try_init_with_post_compute(compute, on_recursion, |_| Ok(()))
    }

    pub fn get_or_try_init_with_post_compute<E, F, R, P>(
        &self,
        compute: F,
        on_recursion: R,
        post_compute: P,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        R: FnOnce() -> T,
        P: FnOnce(&mut T) -> Result<(), E>,
    {
        match self.core.begin() {
            Begin::Ready(value) => Ok(value),
            Begin::Reentrant => Ok(on_recursion()),
            Begin::Owner(guard) => {
                let mut value = compute()?;
                post_compute(&mut value)?;
                Ok(guard.publish(value))
            }
        }
    }
}

impl<T: Clone> Default for RecursionTolerantLazyValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for RecursionTolerantLazyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core.peek() {
            Some(value) => f
                .debug_tuple("RecursionTolerantLazyValue")
                .field(&value)
                .finish(),
            None => f.write_str("RecursionTolerantLazyValue(<not computed>)"),
        }
    }
}

#[cfg(test)]
#[path = "tests/lazy_value_tests.rs"]
mod tests;
