//! Engine lifecycle flags shared between the engine and its listener.
//!
//! The engine owns shutdown: it sets the flags, closes the socket, and waits
//! for the listener to notice. The listener only ever reads them. All four
//! transitions are one-way; once a flag is `true` it never reverts for the
//! lifetime of the engine instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Shutdown state of an engine instance.
///
/// Four independent monotonic booleans, readable without blocking from any
/// thread. Writers additionally wake anyone parked in [`wait_timeout`],
/// so a throttled listener notices shutdown without sleeping out its delay.
///
/// [`wait_timeout`]: LifecycleFlags::wait_timeout
///
/// # Example
///
/// ```rust
/// use mdns_engine::LifecycleFlags;
///
/// let flags = LifecycleFlags::new();
/// assert!(!flags.any_set());
///
/// flags.set_canceling();
/// assert!(flags.is_canceling());
/// assert!(flags.any_set());
/// ```
#[derive(Debug, Default)]
pub struct LifecycleFlags {
    canceling: AtomicBool,
    canceled: AtomicBool,
    closing: AtomicBool,
    closed: AtomicBool,
    // Parked waiters are woken on every transition.
    lock: Mutex<()>,
    cond: Condvar,
}

impl LifecycleFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shutdown has been requested but is not yet complete.
    pub fn is_canceling(&self) -> bool {
        self.canceling.load(Ordering::Acquire)
    }

    /// Shutdown is complete.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Whether any of the four flags is set.
    pub fn any_set(&self) -> bool {
        self.is_canceling() || self.is_canceled() || self.is_closing() || self.is_closed()
    }

    pub fn set_canceling(&self) {
        self.set(&self.canceling);
    }

    pub fn set_canceled(&self) {
        self.set(&self.canceled);
    }

    pub fn set_closing(&self) {
        self.set(&self.closing);
    }

    pub fn set_closed(&self) {
        self.set(&self.closed);
    }

    fn set(&self, flag: &AtomicBool) {
        flag.store(true, Ordering::Release);
        // Hold the lock across the notify so a waiter cannot re-check the
        // flags and park between our store and our wake.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.cond.notify_all();
    }

    /// Sleep for up to `timeout`, returning early if any flag gets set.
    ///
    /// Returns `true` if a flag was set when the wait ended. An early return
    /// is a cooperative cancellation signal, not an error; callers re-check
    /// their loop condition and exit normally.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.any_set() {
            return true;
        }
        let (_guard, _result) = self
            .cond
            .wait_timeout(guard, timeout)
            .unwrap_or_else(|e| e.into_inner());
        self.any_set()
    }
}
