use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing on stderr so streamed replies on stdout stay clean.
///
/// Default level: `info,finalyser=debug`, override via `RUST_LOG`.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,finalyser=debug"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).init();

    tracing::debug!("tracing initialized");
}
