/*!
 * Monitoring
 * Structured tracing setup and run spans
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, RunSpan};
