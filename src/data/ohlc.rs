//! OHLC rows for the candlestick variant.

use chrono::{DateTime, NaiveDateTime};

use crate::data::frame::{RawFrame, RawRow};

const OPEN: usize = 0;
const HIGH: usize = 1;
const LOW: usize = 2;
const CLOSE: usize = 3;
const TIMESTAMP: usize = 4;

/// One candle. A null cell stays `None`; it is never read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcPoint {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub timestamp_millis: i64,
}

impl OhlcPoint {
    /// Map `[open, high, low, close, timestamp]`. Returns `None` when the
    /// timestamp is missing or unreadable.
    pub fn from_row(row: &RawRow) -> Option<Self> {
        let timestamp_millis = parse_timestamp_millis(row.cell(TIMESTAMP)?)?;
        Some(Self {
            open: row.number(OPEN),
            high: row.number(HIGH),
            low: row.number(LOW),
            close: row.number(CLOSE),
            timestamp_millis,
        })
    }

    /// All four prices are present.
    pub fn is_complete(&self) -> bool {
        self.open.is_some() && self.high.is_some() && self.low.is_some() && self.close.is_some()
    }

    pub fn timestamp_seconds(&self) -> f64 {
        self.timestamp_millis as f64 / 1000.0
    }
}

/// Map every row of `frame` to a candle, dropping rows without a usable timestamp.
pub fn ohlc_points(frame: RawFrame) -> Vec<OhlcPoint> {
    let total = frame.len();
    let points: Vec<OhlcPoint> = frame.rows.iter().filter_map(OhlcPoint::from_row).collect();
    if points.len() != total {
        log::debug!(
            "ohlc: dropped {} of {} rows without a parsable timestamp",
            total - points.len(),
            total
        );
    }
    points
}

/// Parse a timestamp cell into epoch milliseconds.
///
/// Accepts RFC 3339, the `YYYY-MM-DD HH:MM:SS[.f]+HH:MM` form written by
/// dataframe CSV export, and naive `YYYY-MM-DD HH:MM:SS[.f]` read as UTC.
pub fn parse_timestamp_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.timestamp_millis());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(ndt.and_utc().timestamp_millis());
        }
    }
    None
}
