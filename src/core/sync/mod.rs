/*!
 * Synchronization Primitives
 *
 * Wait/notify on a shared value guarded by a mutex:
 * - `ConditionCell` owns the value, the lock and the condvar bound to it
 * - `CellGuard` is the only way to read the value, and proves the lock is held
 * - `set_and_notify` is the only way to change it
 *
 * # Architecture
 *
 * One canonical strategy: parking_lot's Mutex + Condvar. Waiting always
 * re-checks a predicate under the lock, so spurious wakeups and notifies
 * that land before the wait starts are both handled.
 */

mod cell;
mod traits;
mod wait;

pub use cell::{CellGuard, ConditionCell};
pub use traits::WakeResult;
pub use wait::{WaitError, WaitResult};
