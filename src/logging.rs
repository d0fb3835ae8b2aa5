use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logs to stderr. `RUST_LOG` takes precedence over the built-in directives.
pub fn setup_logging(verbose: bool) {
    let dirs = match verbose {
        true => "warn,huffpack=debug",
        false => "warn,huffpack=info",
    };

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(dirs)))
        .with(main_layer)
        .init()
}
