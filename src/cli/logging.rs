//! Diagnostic logging to stderr.
//!
//! `LOGGEN_LOG` takes an `EnvFilter` directive (e.g. `loggen=trace`). Without
//! it the filter is `loggen=warn`, or `loggen=debug` with `--verbose`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LOGGEN_LOG";

pub fn init_tracing(verbose: bool) {
    let default = if verbose { "loggen=debug" } else { "loggen=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
