//! Tracing subscriber setup.
//!
//! Errors only by default; `--verbose` shows warnings and binmap's own debug
//! output. `RUST_LOG` overrides both. Everything goes to stderr so stdout
//! stays machine-readable.

use tracing_subscriber::EnvFilter;

const QUIET: &str = "error";
const VERBOSE: &str = "warn,binmap_core=debug,binmap_runtime=debug,binmap_cli=debug";

/// Filter directives used when `RUST_LOG` is not set.
pub const fn default_directives(verbose: bool) -> &'static str {
    if verbose { VERBOSE } else { QUIET }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
