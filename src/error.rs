//! Error types shared by the fetch, extraction and configuration layers.
//!
//! Decoding never fails (malformed rows are dropped), so there is no decode
//! error. Everything else is surfaced as a non-fatal value the controller can
//! report to the user.

use crate::fetch::MAX_LOOKBACK_DAYS;

/// Failure to interpret the metadata row of a frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("frame has no metadata row")]
    MissingMeta,
    #[error("metadata field `{field}` is not numeric: {value:?}")]
    InvalidMeta {
        field: &'static str,
        value: Option<String>,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("lookback of {requested} days exceeds the {max} day limit")]
    LookbackOutOfRange { requested: u32, max: u32 },
    #[error("lookback is not a whole number of days: {0:?}")]
    InvalidLookback(String),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Extract: {0}")]
    Extract(#[from] ExtractError),
}

impl FetchError {
    /// Short message suitable for the status line; details go to the log.
    pub fn to_user_message(&self) -> String {
        match self {
            FetchError::LookbackOutOfRange { requested, .. } => {
                log::warn!("Lookback rejected: {requested} days");
                format!("Lookback is limited to {MAX_LOOKBACK_DAYS} days.")
            }
            FetchError::InvalidLookback(raw) => {
                log::warn!("Lookback rejected: {raw:?}");
                "Lookback must be a whole number of days.".to_string()
            }
            FetchError::Http(err) => {
                log::error!("Fetch transport error: {err}");
                "Network error while contacting the data endpoint.".to_string()
            }
            FetchError::Status { status, body } => {
                log::error!("Fetch HTTP {status}: {body}");
                format!("Data endpoint answered HTTP {status}.")
            }
            FetchError::Extract(err) => {
                log::error!("Fetch extract error: {err}");
                "Unexpected response from the data endpoint. Check logs for details.".to_string()
            }
        }
    }

    /// `true` for errors raised before any request was sent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FetchError::LookbackOutOfRange { .. } | FetchError::InvalidLookback(_)
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
}
