pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
