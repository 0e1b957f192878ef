//! The shared three-state cell behind every lazy value.
//!
//! States: not computed, computing (owned by one thread), computed. The final
//! value lives in a `OnceLock` so reads after publication never take the lock.
//! The state mutex is held only for transitions, never across the user
//! computation, which is what lets the computing thread observe its own
//! reentrant reads instead of deadlocking.
//!
//! Threads blocked on a cell are recorded in a process-wide wait-for table.
//! A wait that would close a loop of threads, each blocked on a cell the next
//! one is computing, is answered like a reentrant read instead of blocking.

use rustc_hash::FxHashMap;
use std::sync::{Condvar, LazyLock, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

/// Blocked thread -> (thread owning the cell it waits on, that cell).
static WAITS_FOR: LazyLock<Mutex<FxHashMap<ThreadId, (ThreadId, usize)>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Record that `waiter` blocks on a cell owned by `owner`. Returns false,
/// recording nothing, when `owner` already waits on `waiter` directly or
/// through other blocked threads.
fn register_wait(waiter: ThreadId, owner: ThreadId, cell: usize) -> bool {
    let mut waits = WAITS_FOR.lock().unwrap_or_else(PoisonError::into_inner);
    let mut current = owner;
    for _ in 0..=waits.len() {
        if current == waiter {
            return false;
        }
        match waits.get(&current) {
            Some(&(next, _)) => current = next,
            None => break,
        }
    }
    waits.insert(waiter, (owner, cell));
    true
}

/// Drop every wait on `cell`; its owner is done with it.
fn release_waiters(cell: usize) {
    WAITS_FOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|_, (_, waited)| *waited != cell);
}

fn unregister_wait(waiter: ThreadId) {
    WAITS_FOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&waiter);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    NotComputed,
    Computing(ThreadId),
}

pub(crate) struct CellCore<T> {
    value: OnceLock<T>,
    state: Mutex<CellState>,
    finished: Condvar,
}

/// Outcome of trying to start a computation.
pub(crate) enum Begin<'a, T> {
    /// The value is already published.
    Ready(T),
    /// The current thread is already computing this cell, or waiting for it
    /// would deadlock with the threads already blocked.
    Reentrant,
    /// The current thread now owns the computation.
    Owner(ComputeGuard<'a, T>),
}

impl<T: Clone> CellCore<T> {
    pub(crate) const fn new() -> Self {
        Self {
            value: OnceLock::new(),
            state: Mutex::new(CellState::NotComputed),
            finished: Condvar::new(),
        }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<T> {
        self.value.get().cloned()
    }

    #[inline]
    pub(crate) fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns true while some thread is inside this cell's computation.
    pub(crate) fn is_computing(&self) -> bool {
        matches!(*self.lock_state(), CellState::Computing(_))
    }

    pub(crate) fn begin(&self) -> Begin<'_, T> {
        if let Some(value) = self.value.get() {
            return Begin::Ready(value.clone());
        }

        let me = thread::current().id();
        let mut state = self.lock_state();
        loop {
            if let Some(value) = self.value.get() {
                return Begin::Ready(value.clone());
            }
            match *state {
                CellState::NotComputed => {
                    *state = CellState::Computing(me);
                    return Begin::Owner(ComputeGuard { core: self });
                }
                CellState::Computing(owner) if owner == me => return Begin::Reentrant,
                CellState::Computing(owner) => {
                    if !register_wait(me, owner, self.address()) {
                        tracing::debug!(?owner, "cross-thread wait cycle, answering as reentrant");
                        return Begin::Reentrant;
                    }
                    state = self
                        .finished
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                    unregister_wait(me);
                }
            }
        }
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }

    fn lock_state(&self) -> MutexGuard<'_, CellState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership of an in-progress computation.
///
/// Dropping the guard without publishing (error or panic) returns the cell to
/// the not-computed state and wakes waiting threads so one of them retries.
pub(crate) struct ComputeGuard<'a, T> {
    core: &'a CellCore<T>,
}

impl<T: Clone> ComputeGuard<'_, T> {
    /// Install the final value. Readers blocked on this cell wake up after the
    /// guard is dropped and observe the value.
    pub(crate) fn publish(self, value: T) -> T {
        if self.core.value.set(value.clone()).is_err() {
            // Unreachable while the guard is held: only the owner publishes.
            tracing::warn!("lazy cell published twice; keeping the first value");
        }
        value
    }
}

impl<T> Drop for ComputeGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self
            .core
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *state = CellState::NotComputed;
        drop(state);
        release_waiters(self.core as *const CellCore<T> as usize);
        self.core.finished.notify_all();
    }
}
