/*!
 * Controller (Trunk) Task
 *
 * Starts the worker, sleeps, sets the flag, joins the worker.
 *
 * # Design: Scoped Ownership
 *
 * The condition cell is a local of `Controller::run` and the worker runs on
 * a scoped thread that borrows it. No statics, no `Arc`: the cell lives
 * exactly as long as the run.
 */

use super::announce::{Announcement, Announcer};
use super::config::RendezvousConfig;
use super::worker::Worker;
use crate::core::errors::{RendezvousError, RendezvousResult};
use crate::core::sync::{ConditionCell, WakeResult};
use crate::monitoring::RunSpan;
use std::any::Any;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Wall-clock time from cell creation to worker joined
    pub elapsed: Duration,
    /// Waiters parked on the cell when the flag was set (0 or 1)
    pub wake: WakeResult,
}

/// Handle to a running worker thread
///
/// `join` is idempotent: once the worker has been joined, further calls
/// return `Ok(())` immediately.
pub struct WorkerHandle<'scope> {
    name: &'static str,
    handle: Option<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> WorkerHandle<'scope> {
    fn new(name: &'static str, handle: ScopedJoinHandle<'scope, ()>) -> Self {
        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the worker thread has exited (always true once joined)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Block until the worker thread exits
    pub fn join(&mut self) -> RendezvousResult<()> {
        let Some(handle) = self.handle.take() else {
            debug!(worker = self.name, "worker already joined");
            return Ok(());
        };

        handle.join().map_err(|payload| {
            let message = panic_message(payload.as_ref());
            error!(worker = self.name, %message, "worker panicked");
            RendezvousError::WorkerPanicked(message)
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// The trunk task
pub struct Controller<A: Announcer> {
    config: RendezvousConfig,
    announcer: A,
}

impl<A: Announcer> Controller<A> {
    pub fn new(config: RendezvousConfig, announcer: A) -> Self {
        Self { config, announcer }
    }

    pub fn config(&self) -> &RendezvousConfig {
        &self.config
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    /// Run the rendezvous once
    ///
    /// 1. start the worker
    /// 2. sleep for the configured delay
    /// 3. set the flag and notify
    /// 4. join the worker
    pub fn run(&self) -> RendezvousResult<RunReport> {
        let run = RunSpan::new(self.config.delay);
        let _entered = run.enter();
        info!(delay_ms = self.config.delay.as_millis() as u64, "rendezvous starting");

        let cell = ConditionCell::new(false);

        let wake = thread::scope(|scope| -> RendezvousResult<WakeResult> {
            self.announcer.announce(Announcement::WorkerSpawned);
            let mut worker = self.spawn_worker(scope, &cell, &run)?;

            self.announcer
                .announce(Announcement::SleepStarted(self.config.delay));
            thread::sleep(self.config.delay);

            self.announcer.announce(Announcement::FlagSet);
            let wake = cell.set_and_notify(|flag| *flag = true);
            debug!(?wake, "flag set");

            self.announcer.announce(Announcement::JoinStarted);
            worker.join()?;
            Ok(wake)
        })?;

        let report = RunReport {
            run_id: run.run_id(),
            elapsed: run.elapsed(),
            wake,
        };
        info!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            woken = report.wake.count(),
            "rendezvous complete"
        );
        Ok(report)
    }

    fn spawn_worker<'scope, 'env: 'scope>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        cell: &'env ConditionCell<bool>,
        run: &RunSpan,
    ) -> RendezvousResult<WorkerHandle<'scope>> {
        let announcer = &self.announcer;
        let span = run.span().clone();

        let handle = thread::Builder::new()
            .name(self.config.worker_name.to_string())
            .spawn_scoped(scope, move || {
                let _entered = span.enter();
                Worker::new(cell, announcer).run();
            })
            .map_err(|e| {
                error!(error = %e, "failed to spawn worker");
                RendezvousError::SpawnFailed(e.to_string())
            })?;

        debug!(worker = self.config.worker_name, "worker spawned");
        Ok(WorkerHandle::new(self.config.worker_name, handle))
    }
}
