use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber, `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracer(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
