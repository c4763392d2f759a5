/*!
 * Condition Cell
 *
 * A value guarded by a mutex, paired with a condvar bound to that mutex.
 *
 * # Design: Reads Through a Guard, Writes Through Notify
 *
 * The value is only reachable through a `CellGuard`, so every read happens
 * with the lock held. The guard hands out shared references only; the one
 * way to mutate the value is `set_and_notify`, which wakes every waiter
 * before releasing the lock. A waiter can therefore never miss a change:
 * either it checks the predicate after the change (and sees it), or it is
 * already parked on the condvar when the notify happens.
 *
 * Uses parking_lot's Mutex/Condvar, which cannot be poisoned. A panic in a
 * predicate or mutator unwinds through the guard and releases the lock.
 */

use super::traits::WakeResult;
use super::wait::{WaitError, WaitResult};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Shared value + lock + wait/notify channel
///
/// # Examples
///
/// ```
/// use condcell::ConditionCell;
/// use std::thread;
///
/// let cell = ConditionCell::new(false);
///
/// thread::scope(|s| {
///     s.spawn(|| {
///         let guard = cell.acquire().wait_until(|ready| *ready);
///         assert!(*guard);
///     });
///     cell.set_and_notify(|ready| *ready = true);
/// });
/// ```
pub struct ConditionCell<T> {
    value: Mutex<T>,
    changed: Condvar,
    /// Threads parked on `changed`. Only modified with `value` locked.
    waiters: AtomicUsize,
}

impl<T> ConditionCell<T> {
    /// Create a new cell holding `value`
    pub const fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            changed: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Block until the lock is obtained
    ///
    /// The lock is released when the returned guard is dropped, including
    /// on early return and panic unwind.
    #[inline]
    pub fn acquire(&self) -> CellGuard<'_, T> {
        CellGuard {
            cell: self,
            inner: self.value.lock(),
        }
    }

    /// Apply `mutator` under the lock and wake every waiter
    ///
    /// Waiters are notified before the lock is released. Returns how many
    /// threads were parked on the cell at notify time.
    pub fn set_and_notify<F>(&self, mutator: F) -> WakeResult
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.value.lock();
        mutator(&mut guard);
        let parked = self.waiters.load(Ordering::Relaxed);
        self.changed.notify_all();
        drop(guard);

        trace!(parked, "condition cell notified");
        WakeResult::from_count(parked)
    }

    /// Approximate count of parked waiters (for diagnostics)
    #[inline]
    pub fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    /// Copy the current value out under the lock
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        T::clone(&self.acquire())
    }

    /// Consume the cell, returning the value
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for ConditionCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ConditionCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ConditionCell");
        match self.value.try_lock() {
            Some(value) => d.field("value", &&*value),
            None => d.field("value", &format_args!("<locked>")),
        };
        d.field("waiters", &self.waiter_count()).finish()
    }
}

/// Proof that the cell's lock is held
///
/// Dereferences to the guarded value. Dropping the guard releases the lock.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct CellGuard<'a, T> {
    cell: &'a ConditionCell<T>,
    inner: MutexGuard<'a, T>,
}

impl<'a, T> CellGuard<'a, T> {
    /// Block until `predicate` holds
    ///
    /// The predicate is checked first, so an already-satisfied condition
    /// returns without parking. Otherwise the lock is released atomically
    /// while parked, re-acquired on wake, and the predicate re-checked;
    /// spurious wakeups loop back to parking. Returns with the lock held.
    pub fn wait_until<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        while !predicate(&self.inner) {
            self.cell.waiters.fetch_add(1, Ordering::Relaxed);
            self.cell.changed.wait(&mut self.inner);
            self.cell.waiters.fetch_sub(1, Ordering::Relaxed);
            trace!("condition cell woken, re-checking predicate");
        }
        self
    }

    /// Bounded variant of [`wait_until`](Self::wait_until)
    ///
    /// Returns `WaitError::Timeout` if the predicate is still false once
    /// `timeout` has elapsed. The lock is released on timeout.
    pub fn wait_until_for<F>(mut self, mut predicate: F, timeout: Duration) -> WaitResult<Self>
    where
        F: FnMut(&T) -> bool,
    {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Ok(self.wait_until(predicate));
        };

        while !predicate(&self.inner) {
            self.cell.waiters.fetch_add(1, Ordering::Relaxed);
            let result = self.cell.changed.wait_until(&mut self.inner, deadline);
            self.cell.waiters.fetch_sub(1, Ordering::Relaxed);

            // A notify racing the deadline still counts if the value changed
            if result.timed_out() && !predicate(&self.inner) {
                trace!(?timeout, "condition cell wait timed out");
                return Err(WaitError::Timeout(timeout));
            }
        }
        Ok(self)
    }
}

impl<T> Deref for CellGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for CellGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellGuard").field(&*self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_wait_returns_immediately_when_satisfied() {
        let cell = ConditionCell::new(true);
        let start = Instant::now();

        let guard = cell.acquire().wait_until(|flag| *flag);

        assert!(*guard);
        assert_eq!(cell.waiter_count(), 0);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_notify_wakes_parked_waiter() {
        let cell = Arc::new(ConditionCell::new(false));
        let cell_clone = cell.clone();

        let handle = thread::spawn(move || {
            let guard = cell_clone.acquire().wait_until(|flag| *flag);
            *guard
        });

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        assert_eq!(cell.waiter_count(), 1);

        let result = cell.set_and_notify(|flag| *flag = true);
        assert_eq!(result, WakeResult::Woken(1));

        assert!(handle.join().unwrap());
        assert_eq!(cell.waiter_count(), 0);
    }

    #[test]
    fn test_notify_without_waiters() {
        let cell = ConditionCell::new(0u32);
        let result = cell.set_and_notify(|v| *v += 1);

        assert_eq!(result, WakeResult::NoWaiters);
        assert_eq!(cell.snapshot(), 1);
    }

    #[test]
    fn test_unsatisfying_notify_keeps_waiting() {
        let cell = Arc::new(ConditionCell::new(0u32));
        let cell_clone = cell.clone();

        let handle = thread::spawn(move || {
            let guard = cell_clone.acquire().wait_until(|v| *v >= 3);
            *guard
        });

        for _ in 0..3 {
            thread::sleep(Duration::from_millis(20));
            cell.set_and_notify(|v| *v += 1);
        }

        assert_eq!(handle.join().unwrap(), 3);
    }

    #[test]
    fn test_wait_until_for_timeout() {
        let cell = ConditionCell::new(false);
        let start = Instant::now();

        let result = cell
            .acquire()
            .wait_until_for(|flag| *flag, Duration::from_millis(50));

        assert!(matches!(result, Err(WaitError::Timeout(_))));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(cell.waiter_count(), 0);

        // Lock was released on timeout
        drop(cell.acquire());
    }

    #[test]
    fn test_wait_until_for_satisfied() {
        let cell = Arc::new(ConditionCell::new(false));
        let cell_clone = cell.clone();

        let handle = thread::spawn(move || {
            cell_clone
                .acquire()
                .wait_until_for(|flag| *flag, Duration::from_secs(2))
                .map(|guard| *guard)
        });

        thread::sleep(Duration::from_millis(50));
        cell.set_and_notify(|flag| *flag = true);

        assert_eq!(handle.join().unwrap(), Ok(true));
    }

    #[test]
    fn test_wait_until_for_huge_timeout() {
        let cell = ConditionCell::new(true);
        let guard = cell.acquire().wait_until_for(|flag| *flag, Duration::MAX);
        assert!(guard.is_ok());
    }

    #[test]
    fn test_lock_released_after_predicate_panic() {
        let cell = Arc::new(ConditionCell::new(false));
        let cell_clone = cell.clone();

        let result = thread::spawn(move || {
            let _guard = cell_clone.acquire().wait_until(|_| panic!("predicate failed"));
        })
        .join();

        assert!(result.is_err());
        assert!(!cell.snapshot());
    }

    #[test]
    fn test_debug_format() {
        let cell = ConditionCell::new(7u8);
        assert_eq!(format!("{:?}", cell), "ConditionCell { value: 7, waiters: 0 }");

        let guard = cell.acquire();
        assert_eq!(format!("{:?}", guard), "CellGuard(7)");
        assert_eq!(
            format!("{:?}", cell),
            "ConditionCell { value: <locked>, waiters: 0 }"
        );
    }
}
