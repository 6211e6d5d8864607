//! Tracing output for tests.

use tracing_subscriber::{EnvFilter, fmt};

/// Route tracing events to the test harness's captured output.
///
/// Honors `RUST_LOG`, defaulting to `glacier_client=debug`. Safe to call
/// from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("glacier_client=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
