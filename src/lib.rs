//! ivplot crate root: re-exports and module wiring.
//!
//! ivplot fetches option IV/price telemetry as CSV, decodes it and renders it
//! as multi-axis line charts or IV candles in an egui window.
//!
//! - `data`: decoding, series extraction, variant layouts and tick formatting
//! - `chart`: the live chart descriptor and its render/update path
//! - `fetch`: HTTP access to the data endpoints with the lookback guard
//! - `controllers`: the reconfiguration state machine
//! - `config`: endpoint and window configuration
//! - `app`: the eframe viewer

pub mod app;
pub mod chart;
pub mod color_scheme;
pub mod config;
pub mod controllers;
pub mod data;
pub mod error;
pub mod fetch;

// Public re-exports for a compact external API
pub use app::{run_ivplot, IvPlotApp};
pub use chart::{
    render, update, AxisConfig, AxisId, ChartDescriptor, Dataset, DatasetData, DrawType,
    Presentation, TickFormat,
};
pub use color_scheme::{BorderMode, CandlePalette};
pub use config::IvPlotConfig;
pub use controllers::{
    ChartStatus, CompletionOutcome, ControlValues, ControllerState, FetchCompletion, FetchTicket,
    ReconfigController,
};
pub use data::axis_format::TickFormatter;
pub use data::frame::{decode, RawFrame, RawRow};
pub use data::ohlc::OhlcPoint;
pub use data::series::{extract, MetaRecord, SeriesSet};
pub use data::variant::{ChartVariant, FetchedData};
pub use error::{ConfigError, ExtractError, FetchError};
pub use fetch::{FetchClient, HttpTransport, LookbackWindow, Transport, MAX_LOOKBACK_DAYS};
