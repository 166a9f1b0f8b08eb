use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "skein=info";

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Failure to install the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("invalid tracing filter directive `{directive}`: {source}")]
    InvalidFilter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to install tracing subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs process-global tracing output for Skein binaries.
///
/// Uses `RUST_LOG` when present and falls back to [`DEFAULT_FILTER`]
/// otherwise. Repeated calls are no-ops after the first successful one.
///
/// # Errors
///
/// Fails if another global subscriber was installed first.
pub fn init_tracing() -> Result<(), TelemetryInitError> {
    if TRACING_INITIALIZED.get().is_some() {
        return Ok(());
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter()?)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    let _ = TRACING_INITIALIZED.set(());
    Ok(())
}

fn resolve_filter() -> Result<EnvFilter, TelemetryInitError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(DEFAULT_FILTER).map_err(|source| TelemetryInitError::InvalidFilter {
            directive: DEFAULT_FILTER.to_string(),
            source,
        })
    })
}
