//! Tracing subscriber bootstrap for hosts and binaries.
//!
//! Filtering follows `RUST_LOG` when set and falls back to
//! [`LogConfig::filter`]. Output always goes to stderr; a non-blocking file
//! layer is added when a log directory is configured.

use std::path::PathBuf;

use anyhow::Context as _;
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Directory for the log file; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            log_dir: None,
            file_name: "combat-sim.log".to_owned(),
            ansi: true,
        }
    }
}

impl LogConfig {
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Platform cache directory for logs, e.g. `~/.cache/combat-sim/logs`.
    pub fn default_log_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "combat-sim").map(|dirs| dirs.cache_dir().join("logs"))
    }
}

/// Keeps the file writer alive. Drop it last.
#[must_use = "dropping the guard stops the file writer"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set or the log directory cannot
/// be created.
pub fn init(config: &LogConfig) -> anyhow::Result<LogGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(dir) = &config.log_dir {
        tracing::info!(
            target: "runtime::logging",
            file = %dir.join(&config.file_name).display(),
            "file logging enabled"
        );
    }

    Ok(LogGuard { _file: guard })
}
