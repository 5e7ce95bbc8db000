//! Process-wide log setup for the command line tool.
//!
//! Library code logs through both `log` and `tracing`; `log` records are
//! forwarded into the tracing subscriber installed here.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to install log bridge: {0}")]
    Bridge(#[from] log::SetLoggerError),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogSettings {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Builds the filter: `RUST_LOG` wins, then the verbosity flag.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free for
/// the summary.
pub fn init_logging(settings: LogSettings) -> Result<(), LoggingError> {
    tracing_log::LogTracer::init()?;

    let json_layer = settings
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!settings.json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let subscriber = Registry::default()
        .with(env_filter(settings.verbose))
        .with(json_layer)
        .with(text_layer);

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
