/*!
 * Rendezvous
 *
 * The two-thread demonstration built on `ConditionCell`:
 * - Controller (trunk): spawns the worker, sleeps, sets the flag, joins
 * - Worker (branch): blocks until the flag is true
 */

mod announce;
mod config;
mod controller;
mod worker;

pub use announce::{Announcement, Announcer, Journal, StdoutAnnouncer};
pub use config::RendezvousConfig;
pub use controller::{Controller, RunReport, WorkerHandle};
pub use worker::{Worker, WorkerState};
