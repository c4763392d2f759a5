/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export WaitError from sync module
pub use crate::core::sync::WaitError;

/// Controller/worker task errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RendezvousError {
    #[error("Failed to spawn worker thread: {0}")]
    #[diagnostic(
        code(rendezvous::spawn_failed),
        help("The OS refused to create a thread. Check process thread limits and available memory.")
    )]
    SpawnFailed(String),

    #[error("Worker thread panicked: {0}")]
    #[diagnostic(
        code(rendezvous::worker_panicked),
        help("The worker died before finishing its wait. The condition was not observed.")
    )]
    WorkerPanicked(String),
}

/// Result type for controller/worker operations
pub type RendezvousResult<T> = Result<T, RendezvousError>;
