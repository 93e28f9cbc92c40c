//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// `verbose` overrides the configured filter with `debug`.
pub fn init(filter: &str, verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(filter)?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
