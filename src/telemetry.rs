use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: a `fmt` layer filtered by `RUST_LOG`,
/// defaulting to `info` (`debug` when `verbose`). Logs go to stderr.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(verbose: bool) -> bool {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
