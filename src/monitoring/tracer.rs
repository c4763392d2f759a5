/*!
 * Run Tracing
 * Structured tracing for rendezvous runs using the tracing crate
 *
 * Features:
 * - Run ID generation for correlating controller and worker events
 * - JSON-formatted logs for structured parsing
 * - Span context carried across the worker thread boundary
 *
 * All log output goes to stderr; stdout is reserved for announcements.
 */

use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Slack allowed past the configured delay before a run is reported as slow
const OVERRUN_SLACK: Duration = Duration::from_millis(500);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - CONDCELL_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("CONDCELL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        debug!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .init();
        debug!("Structured tracing initialized");
    }
}

/// Generate a unique run ID for correlating a controller run with its worker
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Span covering one controller run
///
/// Records the elapsed time on drop and warns when the run took noticeably
/// longer than the configured delay.
pub struct RunSpan {
    span: Span,
    start: Instant,
    run_id: Uuid,
    delay: Duration,
}

impl RunSpan {
    pub fn new(delay: Duration) -> Self {
        let run_id = generate_run_id();

        let span = span!(
            Level::INFO,
            "rendezvous",
            run_id = %run_id,
            delay_ms = delay.as_millis() as u64,
            elapsed_ms = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            run_id,
            delay,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The underlying span, for entering it on another thread
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.span.record("elapsed_ms", elapsed.as_millis() as u64);
        let _entered = self.span.enter();

        if elapsed > self.delay.saturating_add(OVERRUN_SLACK) {
            warn!(
                run_id = %self.run_id,
                elapsed_ms = elapsed.as_millis() as u64,
                delay_ms = self.delay.as_millis() as u64,
                "rendezvous overran its delay"
            );
        } else {
            info!(
                run_id = %self.run_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "rendezvous closed"
            );
        }
    }
}
