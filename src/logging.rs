//! Logging setup.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding a filter, e.g. `fpl_picker=debug,reqwest=info`
pub const LOG_ENV: &str = "FPL_PICKER_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "fpl_picker=debug"
    } else {
        "fpl_picker=info"
    }
}

/// Initialize logging to stderr, keeping stdout clean for TSV and JSON.
///
/// `FPL_PICKER_LOG` wins over `verbose` when set and valid.
/// Calling this more than once is harmless.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
