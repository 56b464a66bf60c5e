//! Tracing subscriber setup for the binary

use std::fs::{self, OpenOptions};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, log_path};

/// `RUST_LOG` wins over the configured level
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// With `toFile` set, JSON lines are appended to the log file under the data
/// directory through a non-blocking writer; the returned guard must live
/// until the process exits so buffered lines are flushed. Everything else,
/// including a log file that cannot be opened, logs to stderr.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    if config.to_file {
        let path = log_path();
        let opened = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

        match opened {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(env_filter(config))
                    .with_writer(non_blocking)
                    .init();
                tracing::info!(path = %path.display(), "logging initialized");
                return Some(guard);
            }
            Err(e) => {
                init_stderr(config);
                tracing::warn!(error = %e, path = %path.display(), "failed to open log file; using stderr");
                return None;
            }
        }
    }

    init_stderr(config);
    None
}

fn init_stderr(config: &LogConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
