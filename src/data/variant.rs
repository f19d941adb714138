//! The three chart variants and their static layouts.
//!
//! Each variant fixes the endpoint it reads, how the first CSV row is
//! interpreted, which columns become which series and how those series are
//! drawn. Nothing here is configurable at runtime.

use egui::Color32;

use crate::chart::{AxisConfig, AxisId, AxisPosition, TickFormat};
use crate::data::axis_format::{format_plain, TickFormatter};
use crate::data::frame::{decode, RawFrame};
use crate::data::ohlc::{ohlc_points, OhlcPoint};
use crate::data::series::{
    decode_with_meta, extract, ColumnMap, MetaLayout, MetaRecord, SeriesColumn, SeriesSet,
};
use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartVariant {
    /// ATM strike, put IV and put price over time (three y axes).
    AtmTrend,
    /// IV and trade time per strike for the two nearest expiries.
    SmileCurve,
    /// Hourly OHLC candles of the ATM put IV.
    AtmIv,
}

/// Presentation of one series in a line variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub color: Color32,
    pub axis: AxisId,
    pub hidden: bool,
}

/// A payload interpreted for its variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedData {
    Lines {
        meta: Option<MetaRecord>,
        series: SeriesSet,
    },
    Candles(Vec<OhlcPoint>),
}

impl FetchedData {
    /// Number of data points (labels or candles).
    pub fn len(&self) -> usize {
        match self {
            FetchedData::Lines { series, .. } => series.len(),
            FetchedData::Candles(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const PURPLE: Color32 = Color32::from_rgb(128, 0, 128);
const GREEN: Color32 = Color32::from_rgb(0, 128, 0);

const TREND_COLUMNS: &[SeriesColumn] = &[
    SeriesColumn { key: "atm_strike", column: 1 },
    SeriesColumn { key: "atm_put_iv", column: 2 },
    SeriesColumn { key: "atm_put_price", column: 3 },
    SeriesColumn { key: "aux", column: 4 },
];

const TREND_DATASETS: &[DatasetSpec] = &[
    DatasetSpec { key: "atm_strike", label: "ATM strike", color: Color32::RED, axis: AxisId::Y1, hidden: false },
    DatasetSpec { key: "atm_put_iv", label: "ATM put IV", color: Color32::BLUE, axis: AxisId::Y2, hidden: false },
    DatasetSpec { key: "atm_put_price", label: "ATM put price", color: GREEN, axis: AxisId::Y3, hidden: false },
    DatasetSpec { key: "aux", label: "Aux", color: PURPLE, axis: AxisId::Y1, hidden: true },
];

const SMILE_COLUMNS: &[SeriesColumn] = &[
    SeriesColumn { key: "front_call_iv", column: 1 },
    SeriesColumn { key: "front_call_time", column: 2 },
    SeriesColumn { key: "front_put_iv", column: 3 },
    SeriesColumn { key: "front_put_time", column: 4 },
    SeriesColumn { key: "next_call_iv", column: 5 },
    SeriesColumn { key: "next_call_time", column: 6 },
    SeriesColumn { key: "next_put_iv", column: 7 },
    SeriesColumn { key: "next_put_time", column: 8 },
];

const SMILE_DATASETS: &[DatasetSpec] = &[
    DatasetSpec { key: "front_put_iv", label: "Front PUT IV", color: Color32::BLUE, axis: AxisId::Y1, hidden: false },
    DatasetSpec { key: "front_call_iv", label: "Front CALL IV", color: Color32::RED, axis: AxisId::Y1, hidden: false },
    DatasetSpec { key: "next_put_iv", label: "Next PUT IV", color: Color32::from_rgb(0x87, 0xCE, 0xEB), axis: AxisId::Y1, hidden: false },
    DatasetSpec { key: "next_call_iv", label: "Next CALL IV", color: Color32::from_rgb(0xFF, 0xB6, 0xC1), axis: AxisId::Y1, hidden: false },
    DatasetSpec { key: "front_put_time", label: "Front PUT trade time", color: PURPLE, axis: AxisId::Y2, hidden: false },
    DatasetSpec { key: "front_call_time", label: "Front CALL trade time", color: GREEN, axis: AxisId::Y2, hidden: false },
    DatasetSpec { key: "next_put_time", label: "Next PUT trade time", color: Color32::from_rgb(0xD8, 0xBF, 0xD8), axis: AxisId::Y2, hidden: false },
    DatasetSpec { key: "next_call_time", label: "Next CALL trade time", color: Color32::from_rgb(0x9F, 0xCC, 0x9F), axis: AxisId::Y2, hidden: false },
];

impl ChartVariant {
    pub const ALL: [ChartVariant; 3] = [
        ChartVariant::AtmTrend,
        ChartVariant::SmileCurve,
        ChartVariant::AtmIv,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartVariant::AtmTrend => "ATM trend",
            ChartVariant::SmileCurve => "Smile curve",
            ChartVariant::AtmIv => "ATM IV candles",
        }
    }

    /// Endpoint path relative to the configured base URL.
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            ChartVariant::AtmTrend => "/atm_data",
            ChartVariant::SmileCurve => "/smile_data",
            ChartVariant::AtmIv => "/atm_iv_data",
        }
    }

    pub fn default_lookback_days(&self) -> u32 {
        match self {
            ChartVariant::AtmTrend | ChartVariant::SmileCurve => 10,
            ChartVariant::AtmIv => 20,
        }
    }

    /// Whether the variant draws candles (and so honours draw type, palette and border).
    pub fn is_candles(&self) -> bool {
        matches!(self, ChartVariant::AtmIv)
    }

    /// Column projection for line variants; `None` for candles.
    pub fn column_map(&self) -> Option<ColumnMap> {
        match self {
            ChartVariant::AtmTrend => Some(ColumnMap {
                meta: MetaLayout::UpdatedAt,
                label_column: 0,
                series: TREND_COLUMNS,
            }),
            ChartVariant::SmileCurve => Some(ColumnMap {
                meta: MetaLayout::UpdatedAtWithStrike,
                label_column: 0,
                series: SMILE_COLUMNS,
            }),
            ChartVariant::AtmIv => None,
        }
    }

    /// Draw order and styling of line datasets.
    pub fn datasets(&self) -> &'static [DatasetSpec] {
        match self {
            ChartVariant::AtmTrend => TREND_DATASETS,
            ChartVariant::SmileCurve => SMILE_DATASETS,
            ChartVariant::AtmIv => &[],
        }
    }

    pub fn x_axis(&self) -> AxisConfig {
        let tick_format = match self {
            ChartVariant::AtmTrend => TickFormat::HourTick,
            ChartVariant::SmileCurve => TickFormat::StrikeTick,
            ChartVariant::AtmIv => TickFormat::TimeTick,
        };
        AxisConfig {
            // only the strike axis keeps chart-area grid lines
            grid_lines: matches!(self, ChartVariant::SmileCurve),
            ..AxisConfig::new(AxisId::X, AxisPosition::Bottom, tick_format)
        }
    }

    /// Y axes, primary first. Only the primary axis draws grid lines.
    pub fn y_axes(&self) -> Vec<AxisConfig> {
        match self {
            ChartVariant::AtmTrend => vec![
                AxisConfig::new(AxisId::Y1, AxisPosition::Left, TickFormat::Auto),
                AxisConfig::new(AxisId::Y2, AxisPosition::Right, TickFormat::Auto),
                AxisConfig::new(AxisId::Y3, AxisPosition::Right, TickFormat::Auto),
            ],
            ChartVariant::SmileCurve => vec![
                AxisConfig::new(AxisId::Y1, AxisPosition::Left, TickFormat::Auto),
                AxisConfig::new(AxisId::Y2, AxisPosition::Right, TickFormat::DateTick),
            ],
            ChartVariant::AtmIv => vec![AxisConfig {
                suggested_min: Some(13.0),
                ..AxisConfig::new(AxisId::Y1, AxisPosition::Left, TickFormat::Auto)
            }],
        }
        .into_iter()
        .enumerate()
        .map(|(i, axis)| AxisConfig {
            grid_lines: i == 0,
            ..axis
        })
        .collect()
    }

    /// Chart title, computed once from the metadata row at first render.
    pub fn title(&self, meta: Option<&MetaRecord>, fmt: &TickFormatter) -> String {
        let updated = meta.map(|m| fmt.updated_at(m.updated_at_epoch_seconds));
        match (self, updated) {
            (ChartVariant::AtmTrend, Some(at)) => format!("ATM option parameters ({at} updated)"),
            (ChartVariant::AtmTrend, None) => "ATM option parameters".to_string(),
            (ChartVariant::SmileCurve, updated) => {
                let atm = meta
                    .and_then(|m| m.atm_strike)
                    .map(format_plain)
                    .unwrap_or_else(|| "-".to_string());
                match updated {
                    Some(at) => format!("Smile curve ({at}) ATM = {atm}"),
                    None => format!("Smile curve ATM = {atm}"),
                }
            }
            (ChartVariant::AtmIv, _) => "ATM option IV".to_string(),
        }
    }

    /// Decode a response body and interpret it.
    ///
    /// Line variants keep their metadata line even when it carries a single
    /// field (see [`decode_with_meta`]).
    pub fn parse_body(&self, text: &str) -> Result<FetchedData, ExtractError> {
        let frame = match self.column_map() {
            Some(map) => decode_with_meta(text, map.meta),
            None => decode(text),
        };
        self.interpret(frame)
    }

    /// Interpret a decoded frame for this variant.
    pub fn interpret(&self, frame: RawFrame) -> Result<FetchedData, ExtractError> {
        match self.column_map() {
            Some(map) => {
                let (meta, series) = extract(frame, &map)?;
                Ok(FetchedData::Lines { meta, series })
            }
            None => Ok(FetchedData::Candles(ohlc_points(frame))),
        }
    }
}

impl std::fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ChartVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atm" | "trend" | "atm-trend" => Ok(ChartVariant::AtmTrend),
            "smile" | "smile-curve" => Ok(ChartVariant::SmileCurve),
            "iv" | "atm-iv" | "candles" => Ok(ChartVariant::AtmIv),
            other => Err(format!("unknown chart variant: {other}")),
        }
    }
}
