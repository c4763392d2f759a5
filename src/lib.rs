/*!
 * condcell
 * A mutex-guarded value with wait/notify, and the trunk/branch rendezvous
 * built on it
 */

pub mod core;
pub mod monitoring;
pub mod rendezvous;

// Re-exports
pub use crate::core::errors::{RendezvousError, RendezvousResult};
pub use crate::core::sync::{CellGuard, ConditionCell, WaitError, WaitResult, WakeResult};
pub use monitoring::{init_tracing, RunSpan};
pub use rendezvous::{
    Announcement, Announcer, Controller, Journal, RendezvousConfig, RunReport, StdoutAnnouncer,
    Worker, WorkerHandle, WorkerState,
};
