/*!
 * Worker (Branch) Task
 *
 * Waits on the condition cell until the flag is set, then finishes.
 */

use super::announce::{Announcement, Announcer};
use crate::core::sync::ConditionCell;
use tracing::{debug, info};

/// Worker lifecycle: `Created -> Waiting -> Finished`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Waiting,
    Finished,
}

/// The branch task: blocks until the shared flag is true
pub struct Worker<'a, A: Announcer> {
    cell: &'a ConditionCell<bool>,
    announcer: &'a A,
    state: WorkerState,
}

impl<'a, A: Announcer> Worker<'a, A> {
    pub fn new(cell: &'a ConditionCell<bool>, announcer: &'a A) -> Self {
        Self {
            cell,
            announcer,
            state: WorkerState::Created,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Wait for the flag; the only suspension point of the worker
    ///
    /// No timeout: if nobody ever sets the flag this blocks forever.
    pub fn run(&mut self) {
        if self.state != WorkerState::Created {
            debug!(state = ?self.state, "worker already ran");
            return;
        }

        self.transition(WorkerState::Waiting);
        self.announcer.announce(Announcement::WaitStarted);

        {
            let guard = self.cell.acquire().wait_until(|flag| *flag);
            debug_assert!(*guard);
        }

        self.transition(WorkerState::Finished);
        self.announcer.announce(Announcement::WaitFinished);
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(from = ?self.state, to = ?next, "worker state change");
        self.state = next;
        if next == WorkerState::Finished {
            info!("worker observed the condition");
        }
    }
}
