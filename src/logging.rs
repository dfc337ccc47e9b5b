use std::{fs::OpenOptions, future::Future, path::Path, sync::Mutex};

use anyhow::Context;
use tracing::{
    instrument::{WithDispatch, WithSubscriber},
    Dispatch,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Log destination for one scrape run.
///
/// Nothing is installed globally: work only reaches the file while it runs
/// inside [`RunLog::scope`] or [`RunLog::in_scope`].
pub struct RunLog {
    dispatch: Dispatch,
}

impl RunLog {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: &Path, filter: EnvFilter) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;

        let subscriber = fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_env_filter(filter)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// `RUST_LOG` when set, `info` otherwise.
    pub fn default_filter() -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }

    pub fn scope<F: Future>(&self, fut: F) -> WithDispatch<F> {
        fut.with_subscriber(self.dispatch.clone())
    }

    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
