//! Tracing initialization.

/// Set up the global `tracing` subscriber. Verbose mode widens the default
/// filter from `warn` to `debug` for cforge's own crates; `RUST_LOG` always
/// wins when set.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "debug,cforge=debug"
    } else {
        "warn,cforge=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
