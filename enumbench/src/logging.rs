//! Tracing subscriber setup for the command-line tool.

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding a `Targets` filter, e.g. `enumbench=debug`.
pub const LOG_ENV: &str = "ENUMBENCH_LOG";

/// Install the global subscriber. Calling it twice is harmless.
///
/// `ENUMBENCH_LOG` wins over `verbose`, which only raises the default level
/// from `info` to `debug`.
pub fn init(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}
