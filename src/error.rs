//! Monitor error types

use thiserror::Error;

/// Errors a polling cycle can surface
///
/// Every variant is recoverable at the loop: a failed cycle is logged and
/// the next one runs on schedule.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// One of the five market data requests failed or returned bad data
    #[error("{series} fetch failed: {detail}")]
    DataFetch {
        series: &'static str,
        detail: String,
    },
    /// A required setting was missing at the point it was needed
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The alert webhook could not be delivered
    #[error("Webhook delivery failed: {0}")]
    Dispatch(String),
    /// The chat notification could not be delivered
    #[error("Chat notification failed: {0}")]
    Notification(String),
}

impl MonitorError {
    /// Wrap a transport or decode failure for one data series
    pub fn fetch(series: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::DataFetch {
            series,
            detail: detail.to_string(),
        }
    }
}
