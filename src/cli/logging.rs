use tracing_subscriber::EnvFilter;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` enables debug logs
/// and `--quiet` limits output to errors.
pub fn init(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "envresolve=debug"
    } else if quiet {
        "envresolve=error"
    } else {
        "envresolve=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
