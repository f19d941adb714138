//! Fetching a variant's CSV payload and turning it into chart data.
//!
//! The HTTP layer sits behind [`Transport`] so the client can be driven by an
//! in-memory transport in tests.

use std::future::Future;
use std::time::Duration;

use crate::config::IvPlotConfig;
use crate::data::variant::{ChartVariant, FetchedData};
use crate::error::FetchError;

/// Largest lookback the endpoints are asked for.
pub const MAX_LOOKBACK_DAYS: u32 = 100;

/// Query key carrying the lookback in days.
pub const LOOKBACK_QUERY_KEY: &str = "d";

// ─────────────────────────────────────────────────────────────────────────────
// LookbackWindow
// ─────────────────────────────────────────────────────────────────────────────

/// Trailing days of history, at most [`MAX_LOOKBACK_DAYS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookbackWindow(u32);

impl LookbackWindow {
    pub fn try_new(days: u32) -> Result<Self, FetchError> {
        if days > MAX_LOOKBACK_DAYS {
            return Err(FetchError::LookbackOutOfRange {
                requested: days,
                max: MAX_LOOKBACK_DAYS,
            });
        }
        Ok(Self(days))
    }

    /// Parse the text of a days input field.
    pub fn parse(text: &str) -> Result<Self, FetchError> {
        let days: u32 = text
            .trim()
            .parse()
            .map_err(|_| FetchError::InvalidLookback(text.to_string()))?;
        Self::try_new(days)
    }

    pub fn default_for(variant: ChartVariant) -> Self {
        Self(variant.default_lookback_days().min(MAX_LOOKBACK_DAYS))
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport
// ─────────────────────────────────────────────────────────────────────────────

/// Issues a GET and yields the whole response body as text.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Transport`] over `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(auth_token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_token,
            timeout,
        }
    }

    pub fn from_config(cfg: &IvPlotConfig) -> Self {
        Self::new(cfg.auth_token.clone(), cfg.request_timeout)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut req = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    log::debug!("reading body of HTTP {status} failed: {e}");
                    String::new()
                }
            };
            return Err(FetchError::Status { status, body });
        }

        resp.text().await.map_err(FetchError::from)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FetchClient
// ─────────────────────────────────────────────────────────────────────────────

pub struct FetchClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> FetchClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn request_url(&self, variant: ChartVariant, lookback: LookbackWindow) -> String {
        format!(
            "{}{}?{}={}",
            self.base_url,
            variant.endpoint_path(),
            LOOKBACK_QUERY_KEY,
            lookback.days()
        )
    }

    /// Fetch and interpret one payload.
    ///
    /// A lookback over [`MAX_LOOKBACK_DAYS`] returns
    /// [`FetchError::LookbackOutOfRange`] without touching the transport.
    pub async fn fetch(
        &self,
        variant: ChartVariant,
        lookback_days: u32,
    ) -> Result<FetchedData, FetchError> {
        let lookback = LookbackWindow::try_new(lookback_days)?;
        self.fetch_window(variant, lookback).await
    }

    pub async fn fetch_window(
        &self,
        variant: ChartVariant,
        lookback: LookbackWindow,
    ) -> Result<FetchedData, FetchError> {
        let url = self.request_url(variant, lookback);
        log::debug!("GET {url}");
        let body = self.transport.get(&url).await?;
        let data = variant.parse_body(&body)?;
        log::debug!("{variant}: {} points for {lookback}", data.len());
        Ok(data)
    }
}

impl FetchClient<HttpTransport> {
    pub fn from_config(cfg: &IvPlotConfig) -> Self {
        Self::new(HttpTransport::from_config(cfg), cfg.base_url.clone())
    }
}
