use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Registration {registration_id}: unparseable timestamp {value:?}")]
    InvalidTimestamp {
        registration_id: String,
        value: String,
    },

    #[error("Registration {registration_id}: {reason}")]
    MalformedRecord {
        registration_id: String,
        reason: String,
    },
}

/// Collapse a fallible step into a value, logging the failure.
///
/// This is the one place where errors turn into placeholder output, so the
/// code feeding it can be written with plain `?`.
pub fn or_fallback<T>(
    context: &str,
    result: Result<T, ReportError>,
    fallback: impl FnOnce(&ReportError) -> T,
) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            warn!(context, error = %e, "falling back after failed step");
            fallback(&e)
        }
    }
}
