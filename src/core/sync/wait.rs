/*!
 * Wait Errors
 *
 * Failure modes of bounded waits on a condition cell.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Wait operation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum WaitError {
    #[error("Wait operation timed out after {0:?}")]
    #[diagnostic(
        code(sync::wait_timeout),
        help("The predicate never became true. Check that the notifying side mutates the cell with set_and_notify.")
    )]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = WaitError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Wait operation timed out after 250ms");
    }
}
