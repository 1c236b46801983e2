//! Diagnostic tracing for feedrail
//!
//! User-facing output goes through `println!` and the publish sink. This is
//! the developer channel: off unless `RUST_LOG` or `--debug` asks for it.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "feedrail=warn";
const DEBUG_LOG_FILTER: &str = "feedrail=debug";

/// Install the stderr subscriber
///
/// `RUST_LOG` wins over `debug`. Calling this twice is harmless (the second
/// install is ignored), which keeps tests free to initialize as well.
pub fn init(debug: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    EnvFilter::new(if debug { DEBUG_LOG_FILTER } else { DEFAULT_LOG_FILTER })
  });

  let _ = tracing_subscriber::registry()
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false),
    )
    .with(filter)
    .try_init();
}
