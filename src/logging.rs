//! # Logging
//!
//! Console tracing setup shared by demos and integration tests.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process.
///
/// Honors `RUST_LOG`, defaulting to `docbatch=info`. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docbatch=info"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // A global subscriber may already be set by the embedding process.
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}
