//! Test logging setup

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Initializes tracing output for tests, once per process
///
/// Honors `RUST_LOG`; defaults to warnings only so test output stays quiet
/// unless a failure is being chased.
pub fn init_test_logging() {
    INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}
