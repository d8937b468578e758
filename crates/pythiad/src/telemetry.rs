//! Structured telemetry initialisation for the daemon.
//!
//! Logs go to a rolling file under the daemon's cache directory. Standard
//! output carries responses and nothing else, so no log layer may ever
//! write there.

use std::env;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// File name of the daemon's rolling log, date-stamped per day.
pub const LOG_FILE_NAME: &str = "daemon.log";

/// Filter applied when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// Handle returned when telemetry has been initialised.
///
/// The handle keeps the background log worker alive; dropping it flushes
/// buffered records to the log file. Hold it for the daemon's lifetime.
pub struct TelemetryHandle {
    _worker: Option<WorkerGuard>,
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Repeated calls are idempotent: the first invocation installs the global
/// subscriber and returns the handle owning the log worker. Subsequent
/// invocations detect the existing registration and return an inert
/// [`TelemetryHandle`] without touching the global state again.
///
/// # Examples
///
/// ```rust
/// use pythiad::telemetry;
///
/// # fn main() -> Result<(), pythiad::telemetry::TelemetryError> {
/// let logs = tempfile::tempdir().expect("temporary log directory");
/// let first = telemetry::initialise(logs.path())?;
/// let second = telemetry::initialise(logs.path())?;
///
/// // Both handles remain usable; only the first call installs
/// // telemetry.
/// drop(second);
/// drop(first);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter expression is invalid or a
/// subscriber is already installed outside this guard.
pub fn initialise(log_directory: &Path) -> Result<TelemetryHandle, TelemetryError> {
    let mut worker = None;
    TELEMETRY_GUARD.get_or_try_init(|| {
        worker = Some(install_subscriber(log_directory)?);
        Ok(())
    })?;
    Ok(TelemetryHandle { _worker: worker })
}

fn install_subscriber(log_directory: &Path) -> Result<WorkerGuard, TelemetryError> {
    let filter = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) => {
            EnvFilter::try_new(spec).map_err(|error| TelemetryError::Filter(error.to_string()))?
        }
        Err(_) => EnvFilter::new(DEFAULT_LOG_FILTER),
    };

    let appender = tracing_appender::rolling::daily(log_directory, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer)
        // File sinks never want colour codes.
        .with_ansi(false)
        // Add a timestamp so operators can correlate daemon activity.
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    Ok(guard)
}
