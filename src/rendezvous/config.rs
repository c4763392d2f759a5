/*!
 * Rendezvous Configuration
 *
 * Settings for a controller run
 */

use std::time::Duration;

/// Rendezvous configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendezvousConfig {
    /// How long the controller sleeps before setting the flag
    pub delay: Duration,
    /// Thread name given to the worker
    pub worker_name: &'static str,
}

impl Default for RendezvousConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl RendezvousConfig {
    /// The classic demonstration: ten seconds between spawn and signal
    pub const fn reference() -> Self {
        Self {
            delay: Duration::from_secs(10),
            worker_name: "branch",
        }
    }

    /// Short delay for tests and benchmarks
    pub const fn quick() -> Self {
        Self {
            delay: Duration::from_millis(50),
            worker_name: "branch",
        }
    }

    pub const fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub const fn with_worker_name(self, worker_name: &'static str) -> Self {
        Self {
            worker_name,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference() {
        let config = RendezvousConfig::default();
        assert_eq!(config.delay, Duration::from_secs(10));
        assert_eq!(config.worker_name, "branch");
    }

    #[test]
    fn test_builders() {
        let config = RendezvousConfig::quick()
            .with_delay(Duration::from_millis(5))
            .with_worker_name("waiter");
        assert_eq!(config.delay, Duration::from_millis(5));
        assert_eq!(config.worker_name, "waiter");
    }
}
