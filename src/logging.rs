use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stdout subscriber used by every binary. `RUST_LOG`
/// overrides the default `info` level.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
