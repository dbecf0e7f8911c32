//! Concurrency primitives required by [`crate::channel`].
//!
//! [`TrackedMutex`] wraps a plain mutex with owner tracking: a recursive
//! acquisition by the thread that already holds the lock panics instead of
//! deadlocking silently. Unlock-by-non-owner is structurally impossible in
//! Rust, since only the thread holding a [`TrackedGuard`] can drop it.
//!
//! Condition variables use `std::sync::Condvar` directly; its
//! `wait`/`notify_one`/`notify_all`/`wait_timeout_while` already cover what
//! the channel needs, so no wrapper is introduced for them.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, WaitTimeoutResult};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// A mutex that panics on recursive acquisition by its current owner,
/// instead of deadlocking.
pub struct TrackedMutex<T> {
    inner: Mutex<T>,
    owner: Mutex<Option<ThreadId>>,
}

impl<T> TrackedMutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            owner: Mutex::new(None),
        }
    }

    /// Acquires the lock, blocking the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if the calling thread already holds this lock (a recursive
    /// acquisition, which would otherwise deadlock silently).
    pub fn lock(&self) -> TrackedGuard<'_, T> {
        let me = thread::current().id();
        if *self.owner.lock().unwrap() == Some(me) {
            panic!(
                "TrackedMutex: thread {me:?} attempted to re-acquire a lock it already holds"
            );
        }
        let guard = self.inner.lock().unwrap();
        *self.owner.lock().unwrap() = Some(me);
        TrackedGuard {
            guard: Some(guard),
            owner_cell: &self.owner,
        }
    }
}

/// RAII guard for [`TrackedMutex`]. Releases ownership on drop.
pub struct TrackedGuard<'a, T> {
    guard: Option<MutexGuard<'a, T>>,
    owner_cell: &'a Mutex<Option<ThreadId>>,
}

impl<'a, T> TrackedGuard<'a, T> {
    fn clear_owner(&self) {
        *self.owner_cell.lock().unwrap() = None;
    }

    fn set_owner(&self) {
        *self.owner_cell.lock().unwrap() = Some(thread::current().id());
    }

    /// Waits on `condvar`, releasing ownership tracking for the duration of
    /// the wait and re-establishing it once this thread reacquires the lock.
    pub fn wait(mut self, condvar: &Condvar) -> Self {
        self.clear_owner();
        let inner = self.guard.take().expect("guard already consumed");
        let inner = condvar.wait(inner).unwrap();
        let out = TrackedGuard {
            guard: Some(inner),
            owner_cell: self.owner_cell,
        };
        out.set_owner();
        out
    }

    /// Waits on `condvar` until `condition` returns `false` or `timeout`
    /// elapses, whichever comes first. Mirrors `Condvar::wait_timeout_while`.
    pub fn wait_timeout_while<F>(
        mut self,
        condvar: &Condvar,
        timeout: Duration,
        condition: F,
    ) -> (Self, WaitTimeoutResult)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.clear_owner();
        let inner = self.guard.take().expect("guard already consumed");
        let (inner, result) = condvar.wait_timeout_while(inner, timeout, condition).unwrap();
        let out = TrackedGuard {
            guard: Some(inner),
            owner_cell: self.owner_cell,
        };
        out.set_owner();
        (out, result)
    }
}

impl<T> Deref for TrackedGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.guard.as_ref().expect("guard already consumed")
    }
}

impl<T> DerefMut for TrackedGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.guard.as_mut().expect("guard already consumed")
    }
}

impl<T> Drop for TrackedGuard<'_, T> {
    fn drop(&mut self) {
        if self.guard.is_some() {
            self.clear_owner();
        }
    }
}
