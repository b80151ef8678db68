//! Process-wide logging setup shared by the workspace binaries.

use tracing_subscriber::EnvFilter;

/// Install a compact `tracing` subscriber filtered by `env_filter`.
///
/// `env_filter` takes any [`EnvFilter`] directive, so both a bare level (`debug`) and per-module
/// directives (`info,rn_prep::shortcuts=trace`) work. Invalid directives fall back to `info`.
pub fn setup(env_filter: &str) {
    let filter = EnvFilter::try_new(env_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();
}
