//! Diagnostics go to stderr so they never interleave with the report.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber unless one is already set.
///
/// `GOLANDSPEC_LOG` takes an `EnvFilter` directive and wins over `verbose`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "golandspec=debug"
    } else {
        "golandspec=warn"
    };
    let filter = EnvFilter::try_from_env("GOLANDSPEC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
