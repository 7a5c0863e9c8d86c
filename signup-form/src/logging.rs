//! Tracing subscriber setup
//!
//! The subscriber is installed before configuration is resolved so that
//! config diagnostics (missing file, endpoint source) are visible. The
//! configured `logging.level` is applied afterwards through a reload handle.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Filter used until the configured level is known
pub const STARTUP_LOG_LEVEL: &str = "info";

/// Swaps the active filter once configuration has been loaded
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevelHandle {
    /// Apply the configured level unless `RUST_LOG` already chose one
    pub fn apply_config_level(&self, level: &str) -> Result<(), reload::Error> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::new(level))
    }
}

/// Build the subscriber writing to `make_writer`
///
/// `env_filter` is the filter taken from `RUST_LOG`, if set. It wins over
/// the configured level for the whole run.
pub fn subscriber<W>(
    make_writer: W,
    env_filter: Option<EnvFilter>,
) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let from_env = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(STARTUP_LOG_LEVEL));
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer));

    (subscriber, LogLevelHandle { handle, from_env })
}
