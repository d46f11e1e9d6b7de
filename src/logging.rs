//! Log subscriber setup for the binary.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "VITALWATCH_LOG";

/// Install the global subscriber, writing to stderr.
///
/// `VITALWATCH_LOG` wins when set; otherwise `debug` with `verbose`, else
/// `info`.
pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "vitalwatch=debug"
    } else {
        "vitalwatch=info"
    }
}
