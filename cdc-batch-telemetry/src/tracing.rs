use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Filter applied when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

/// Filter applied to tests when `RUST_LOG` is not set.
const DEFAULT_TEST_LOG_FILTER: &str = "cdc_batch=debug";

static INIT_TEST_TRACING: Once = Once::new();

/// Errors raised while installing the global subscriber.
pub type InitTracingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global tracing subscriber for a service.
///
/// Reads the filter from `RUST_LOG` and falls back to `info`. Every line carries the service
/// name so logs of several handlers in one process can be told apart.
pub fn init_tracing(service_name: &str) -> Result<(), InitTracingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .try_init()?;

    tracing::info!(service = service_name, "tracing initialized");

    Ok(())
}

/// Installs a test subscriber writing through the test harness capture.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_LOG_FILTER));

        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
