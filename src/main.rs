/*!
 * condcell - Main Entry Point
 *
 * Trunk thread starts a branch thread that waits on a condition, sleeps,
 * sets the condition, and joins the branch.
 */

use condcell::{init_tracing, Controller, RendezvousConfig, StdoutAnnouncer};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let controller = Controller::new(RendezvousConfig::default(), StdoutAnnouncer::new());
    let report = controller.run()?;

    info!(
        run_id = %report.run_id,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "exiting"
    );
    Ok(())
}
