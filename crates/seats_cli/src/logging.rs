// crates/seats_cli/src/logging.rs
//
// tracing-subscriber setup. Logs go to stderr; stdout carries only the report.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set (e.g. `RUST_LOG=seats_pipeline=debug`);
/// otherwise the level is `info`, or `warn` with `--quiet`.
pub fn init(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init: a second call (tests) is a no-op instead of a panic.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(false)
        .try_init();
}
