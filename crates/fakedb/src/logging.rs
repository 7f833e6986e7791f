//! Tracing setup for test suites that use FakeDb.

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigurationService;

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins over the configured `log_filter`. Calling it again after a
/// subscriber is installed is a no-op.
pub fn init_tracing() -> anyhow::Result<()> {
    let configured = ConfigurationService::global()
        .document()
        .map(|config| config.log_filter.clone())
        .context("loading FakeDb configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&configured))
        .with_context(|| format!("invalid log filter '{}'", configured))?;

    // Already installed by an earlier call or by the host test suite.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init();
    Ok(())
}
