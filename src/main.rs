//! geoattend main entrypoint.

use geoattend::run;
use tracing_subscriber::EnvFilter;

/// Diagnostic verbosity, e.g. `GEOATTEND_LOG=geoattend=debug`.
const LOG_ENV: &str = "GEOATTEND_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        geoattend::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
