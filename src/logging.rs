//! Tracing setup shared by the helper binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "loadout_catalog=warn";

/// Install a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// Output goes to stderr so stdout stays parseable JSON. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
