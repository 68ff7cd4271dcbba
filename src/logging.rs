//! Per-run logging
//!
//! Every run owns a [`RunLog`]: a tracing dispatcher that appends to
//! `<dest>/conversion.log` and, optionally, echoes to the console. It is
//! opened at run start, entered with [`RunLog::in_scope`], and closed at run end.
//! Worker threads join it through [`current_dispatch`].

use crate::error::{ConvertError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Name of the log file written into the destination root
pub const LOG_FILE_NAME: &str = "conversion.log";

/// Log sink for one run
pub struct RunLog {
    path: PathBuf,
    file: File,
    dispatch: Dispatch,
}

impl RunLog {
    /// Open (append) `<dest_root>/conversion.log`.
    ///
    /// `console` sets the stderr level; `None` keeps the console quiet.
    pub fn open(dest_root: &Path, console: Option<tracing::Level>) -> Result<Self> {
        let path = dest_root.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ConvertError::output_error(&path, e))?;

        // Each event is formatted first, then written under the lock in one call
        let writer = Mutex::new(file.try_clone().map_err(|e| ConvertError::output_error(&path, e))?);
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_thread_names(true)
            .with_filter(LevelFilter::INFO);

        let console_layer = console.map(|level| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase())),
                )
        });

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            path,
            file,
            dispatch: Dispatch::new(subscriber),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this log as the current thread's dispatcher
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Flush the log file to disk
    pub fn close(self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|e| ConvertError::output_error(&self.path, e))
    }
}

/// The dispatcher active on the calling thread, for handing to spawned threads
pub fn current_dispatch() -> Dispatch {
    tracing::dispatcher::get_default(|current| current.clone())
}
