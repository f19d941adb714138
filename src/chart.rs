//! Declarative chart state and the render/update path.
//!
//! A [`ChartDescriptor`] is created once by [`render`] and afterwards only
//! mutated in place by [`update`] and [`ChartDescriptor::apply_presentation`].
//! Whatever draws it (see `app::plot`) keeps its own state keyed on the
//! descriptor, so never replacing the descriptor keeps the drawn chart's
//! identity across refreshes.

use egui::Color32;

use crate::color_scheme::{BorderMode, CandlePalette};
use crate::data::axis_format::{format_plain, format_value_tick, TickFormatter};
use crate::data::frame::parse_number;
use crate::data::ohlc::OhlcPoint;
use crate::data::series::SeriesSet;
use crate::data::variant::{ChartVariant, FetchedData};

// ─────────────────────────────────────────────────────────────────────────────
// Axes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    X,
    Y1,
    Y2,
    Y3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPosition {
    Bottom,
    Left,
    Right,
}

/// Which formatter produces the tick labels of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Plain numbers.
    Auto,
    /// `MM/DD HH:MM` on even hours only.
    HourTick,
    /// Strike values on multiples of 250 only.
    StrikeTick,
    /// `DD日 HH:MM` for epoch-second values.
    DateTick,
    /// `M/D H:00` on an hour-unit time scale.
    TimeTick,
}

impl TickFormat {
    pub fn label(&self, value: f64, fmt: &TickFormatter) -> String {
        match self {
            TickFormat::Auto => format_auto(value),
            TickFormat::HourTick => fmt.format_hour_tick(value),
            TickFormat::StrikeTick => format_value_tick(value),
            TickFormat::DateTick => fmt.format_date_tick(value),
            TickFormat::TimeTick => fmt.format_time_tick(value),
        }
    }
}

fn format_auto(value: f64) -> String {
    if value.fract() == 0.0 {
        format_plain(value)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Configuration of one axis. Axes never share a value domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisConfig {
    pub id: AxisId,
    pub position: AxisPosition,
    pub tick_format: TickFormat,
    /// Draw grid lines across the chart area.
    pub grid_lines: bool,
    /// Lower bound to include even when the data starts higher.
    pub suggested_min: Option<f64>,
}

impl AxisConfig {
    pub fn new(id: AxisId, position: AxisPosition, tick_format: TickFormat) -> Self {
        Self {
            id,
            position,
            tick_format,
            grid_lines: false,
            suggested_min: None,
        }
    }

    /// Value range of every visible dataset bound to this axis.
    ///
    /// Returns `None` when no finite value exists. A flat range is widened
    /// so it can still be mapped onto the plot.
    pub fn domain(&self, datasets: &[Dataset]) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for ds in datasets.iter().filter(|d| d.axis == self.id && !d.hidden) {
            match &ds.data {
                DatasetData::Line(values) => {
                    for v in values.iter().flatten() {
                        lo = lo.min(*v);
                        hi = hi.max(*v);
                    }
                }
                DatasetData::Ohlc(points) => {
                    for p in points {
                        for v in [p.open, p.high, p.low, p.close].into_iter().flatten() {
                            lo = lo.min(v);
                            hi = hi.max(v);
                        }
                    }
                }
            }
        }
        if let Some(min) = self.suggested_min {
            lo = lo.min(min);
            hi = hi.max(min);
        }
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        if lo == hi {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
            return Some((lo - pad, hi + pad));
        }
        Some((lo, hi))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation
// ─────────────────────────────────────────────────────────────────────────────

/// How candles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawType {
    #[default]
    Candlestick,
    /// Open/high/low/close bars with side ticks.
    Bar,
}

impl DrawType {
    pub const ALL: [DrawType; 2] = [DrawType::Candlestick, DrawType::Bar];

    pub fn label(&self) -> &'static str {
        match self {
            DrawType::Candlestick => "Candlestick",
            DrawType::Bar => "OHLC bar",
        }
    }

    /// Read a draw-type control value (`candlestick` or `ohlc`).
    pub fn from_control(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "candlestick" => Some(DrawType::Candlestick),
            "ohlc" | "bar" => Some(DrawType::Bar),
            _ => None,
        }
    }
}

/// Transient styling applied to candle datasets without refetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    pub draw_type: DrawType,
    pub palette: CandlePalette,
    pub border: BorderMode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Datasets
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetData {
    /// One value per label; `None` is a gap.
    Line(Vec<Option<f64>>),
    Ohlc(Vec<OhlcPoint>),
}

impl DatasetData {
    pub fn len(&self) -> usize {
        match self {
            DatasetData::Line(v) => v.len(),
            DatasetData::Ohlc(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub key: String,
    pub label: String,
    pub axis: AxisId,
    pub color: Color32,
    pub hidden: bool,
    pub data: DatasetData,
}

impl Dataset {
    /// Points of a line dataset split at gaps: each inner vector is one
    /// unbroken run of `[x, y]`. Labels that are not numeric also break the run.
    pub fn line_segments(&self, labels: &[Option<f64>]) -> Vec<Vec<[f64; 2]>> {
        let DatasetData::Line(values) = &self.data else {
            return Vec::new();
        };
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (x, y) in labels.iter().zip(values.iter()) {
            match (x, y) {
                (Some(x), Some(y)) => current.push([*x, *y]),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartDescriptor
// ─────────────────────────────────────────────────────────────────────────────

/// The long-lived, mutable description of the displayed chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDescriptor {
    pub variant: ChartVariant,
    pub title: String,
    /// Shared x positions of line datasets (epoch seconds or strikes).
    pub labels: Vec<Option<f64>>,
    pub datasets: Vec<Dataset>,
    pub x_axis: AxisConfig,
    pub y_axes: Vec<AxisConfig>,
    pub presentation: Presentation,
    /// Bumped on every in-place change; drawing code redraws when it moves.
    pub revision: u64,
    /// Bumped only when new points arrive; drawing code re-fits the bounds.
    pub data_revision: u64,
}

impl ChartDescriptor {
    pub fn y_axis(&self, id: AxisId) -> Option<&AxisConfig> {
        self.y_axes.iter().find(|a| a.id == id)
    }

    pub fn dataset(&self, key: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.key == key)
    }

    /// Candles of the OHLC dataset, if this is a candle chart.
    pub fn candles(&self) -> Option<&[OhlcPoint]> {
        self.datasets.iter().find_map(|d| match &d.data {
            DatasetData::Ohlc(points) => Some(points.as_slice()),
            _ => None,
        })
    }

    /// Apply draw type, palette and border. No data is touched.
    pub fn apply_presentation(&mut self, presentation: Presentation) {
        if self.presentation != presentation {
            self.presentation = presentation;
            self.revision += 1;
        }
    }

    /// Request a redraw without changing content.
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render / update
// ─────────────────────────────────────────────────────────────────────────────

/// Build the initial descriptor. The title is computed here and only here.
pub fn render(
    variant: ChartVariant,
    data: FetchedData,
    presentation: Presentation,
    fmt: &TickFormatter,
) -> ChartDescriptor {
    let meta = match &data {
        FetchedData::Lines { meta, .. } => meta.clone(),
        FetchedData::Candles(_) => None,
    };
    let mut descriptor = ChartDescriptor {
        variant,
        title: variant.title(meta.as_ref(), fmt),
        labels: Vec::new(),
        datasets: initial_datasets(variant),
        x_axis: variant.x_axis(),
        y_axes: variant.y_axes(),
        presentation,
        revision: 0,
        data_revision: 0,
    };
    fill(&mut descriptor, data);
    descriptor
}

/// Replace the points of every dataset in place. Title and axes are kept.
///
/// Data of the wrong shape for the variant (lines for a candle chart or the
/// reverse) is ignored with a warning.
pub fn update(descriptor: &mut ChartDescriptor, data: FetchedData) {
    fill(descriptor, data);
    descriptor.revision += 1;
    descriptor.data_revision += 1;
}

fn initial_datasets(variant: ChartVariant) -> Vec<Dataset> {
    if variant.is_candles() {
        return vec![Dataset {
            key: "iv".to_string(),
            label: "iv".to_string(),
            axis: AxisId::Y1,
            color: Color32::GRAY,
            hidden: false,
            data: DatasetData::Ohlc(Vec::new()),
        }];
    }
    variant
        .datasets()
        .iter()
        .map(|spec| Dataset {
            key: spec.key.to_string(),
            label: spec.label.to_string(),
            axis: spec.axis,
            color: spec.color,
            hidden: spec.hidden,
            data: DatasetData::Line(Vec::new()),
        })
        .collect()
}

fn fill(descriptor: &mut ChartDescriptor, data: FetchedData) {
    match data {
        FetchedData::Lines { series, .. } => fill_lines(descriptor, &series),
        FetchedData::Candles(points) => {
            let mut points = Some(points);
            for ds in descriptor.datasets.iter_mut() {
                if let DatasetData::Ohlc(existing) = &mut ds.data {
                    if let Some(p) = points.take() {
                        *existing = p;
                    }
                }
            }
            if points.is_some() {
                log::warn!("{}: candle data for a chart without a candle dataset", descriptor.variant);
            }
        }
    }
}

fn fill_lines(descriptor: &mut ChartDescriptor, series: &SeriesSet) {
    if descriptor.variant.is_candles() {
        log::warn!("{}: line data for a candle chart", descriptor.variant);
        return;
    }
    descriptor.labels = series.numeric_labels();
    for ds in descriptor.datasets.iter_mut() {
        let values = match series.get(&ds.key) {
            Some(s) => s
                .values
                .iter()
                .map(|c| c.as_deref().and_then(parse_number))
                .collect(),
            None => vec![None; series.len()],
        };
        ds.data = DatasetData::Line(values);
    }
}
