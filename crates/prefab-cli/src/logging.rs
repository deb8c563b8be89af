//! Logging setup for the `prefab` binary.
//!
//! The core and adapter crates only emit `tracing` spans and events; this
//! module is the single place a subscriber gets installed. Verbosity comes
//! from the repeated `-v` flag (WARN by default, then INFO, DEBUG, TRACE),
//! `--quiet` drops to ERROR, and an explicit `RUST_LOG` beats the flags
//! entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events the default filter lets through.
const CRATES: [&str; 3] = ["prefab", "prefab_core", "prefab_adapters"];

/// Install the process-wide tracing subscriber.
///
/// Call once, before the first event fires. A second call in the same
/// process fails (`try_init` reports the existing subscriber) rather than
/// panicking.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => {
            let level = verbosity_level(args);
            let directives: Vec<String> =
                CRATES.iter().map(|krate| format!("{krate}={level}")).collect();
            EnvFilter::new(directives.join(","))
        }
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Map `--quiet` / repeated `-v` onto a filter level directive.
fn verbosity_level(args: &GlobalArgs) -> &'static str {
    match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}
