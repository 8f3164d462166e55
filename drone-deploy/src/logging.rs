//! Logging setup.
//!
//! Installs a `tracing-subscriber` fmt layer filtered by `RUST_LOG`, writing
//! to stderr or, when a log file is configured, to that file through a
//! non-blocking writer.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::{DeployError, DeployResult};

/// Logging options.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    pub verbose: bool,

    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "drone_deploy=debug,info"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber.
///
/// Returns the file writer's guard when logging to a file; keep it alive
/// until exit or buffered lines are lost.
pub fn init_logging(options: &LogOptions) -> DeployResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    match &options.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path.file_name().ok_or_else(|| {
                DeployError::InvalidConfig(format!("log file {} has no name", path.display()))
            })?;
            std::fs::create_dir_all(&dir).map_err(|source| DeployError::ReadFailed {
                path: dir.clone(),
                source,
            })?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .map_err(|e| DeployError::InvalidConfig(format!("logging: {}", e)))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()
                .map_err(|e| DeployError::InvalidConfig(format!("logging: {}", e)))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LogOptions::default().default_directive(), "info");
        assert_eq!(
            LogOptions::default().with_verbose(true).default_directive(),
            "drone_deploy=debug,info"
        );
    }

    #[test]
    fn test_builder() {
        let options = LogOptions::default().with_log_file("/tmp/deploy.log");
        assert_eq!(options.log_file, Some(PathBuf::from("/tmp/deploy.log")));
    }
}
