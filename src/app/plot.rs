//! Drawing a [`ChartDescriptor`] with egui_plot.
//!
//! Line charts may carry up to three y axes with unrelated ranges. egui_plot
//! has a single y coordinate, so every dataset is mapped into `0..=1` using
//! its own axis domain and each axis formatter maps the tick back.

use std::ops::RangeInclusive;

use eframe::egui;
use egui::{Color32, Stroke};
use egui_plot::{
    AxisHints, BoxElem, BoxPlot, BoxSpread, GridInput, GridMark, HPlacement, Legend, Line, Plot,
    PlotPoints, PlotUi,
};

use crate::chart::{AxisConfig, AxisPosition, ChartDescriptor, DrawType, TickFormat};
use crate::data::axis_format::{TickFormatter, STRIKE_TICK_STEP};
use crate::data::ohlc::OhlcPoint;

const HOUR: f64 = 3600.0;
/// Candle body width as a fraction of the one-hour slot.
const CANDLE_WIDTH: f64 = 0.7 * HOUR;
/// Upper bound on x grid marks before the spacing is widened.
const MAX_X_MARKS: f64 = 40.0;

/// Per-window drawing state. Bounds are re-fitted whenever new data arrives;
/// a restyle keeps the current zoom.
#[derive(Debug, Default)]
pub struct ChartView {
    last_data_revision: Option<u64>,
}

impl ChartView {
    pub fn show(&mut self, ui: &mut egui::Ui, desc: &ChartDescriptor, fmt: &TickFormatter) {
        ui.vertical_centered(|ui| ui.heading(&desc.title));

        let refit = self.last_data_revision != Some(desc.data_revision);
        self.last_data_revision = Some(desc.data_revision);

        if desc.variant.is_candles() {
            show_candles(ui, desc, fmt, refit);
        } else {
            show_lines(ui, desc, fmt, refit);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Multi-axis lines
// ─────────────────────────────────────────────────────────────────────────────

fn show_lines(ui: &mut egui::Ui, desc: &ChartDescriptor, fmt: &TickFormatter, refit: bool) {
    let fmt = *fmt;
    let domains: Vec<_> = desc
        .y_axes
        .iter()
        .map(|axis| (axis.id, axis.domain(&desc.datasets)))
        .collect();

    let y_axes: Vec<AxisHints> = desc
        .y_axes
        .iter()
        .zip(domains.iter())
        .map(|(axis, (_, domain))| y_axis_hints(axis, *domain, fmt))
        .collect();

    let primary_grid = desc.y_axes.first().map(|a| a.grid_lines).unwrap_or(false);
    let x_format = desc.x_axis.tick_format;

    let mut plot = Plot::new(("ivplot_lines", desc.variant.label()))
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .include_y(0.0)
        .include_y(1.0)
        .show_grid([desc.x_axis.grid_lines, primary_grid])
        .custom_y_axes(y_axes)
        .x_axis_formatter(move |mark, _range| x_format.label(mark.value, &fmt));
    plot = with_x_spacer(plot, x_format, &fmt);
    if refit {
        plot = plot.reset();
    }

    plot.show(ui, |plot_ui| {
        for ds in desc.datasets.iter().filter(|d| !d.hidden) {
            let Some((lo, hi)) = domains
                .iter()
                .find(|(id, _)| *id == ds.axis)
                .and_then(|(_, d)| *d)
            else {
                continue;
            };
            for segment in ds.line_segments(&desc.labels) {
                let points: Vec<[f64; 2]> = segment
                    .into_iter()
                    .map(|[x, y]| [x, (y - lo) / (hi - lo)])
                    .collect();
                plot_ui.line(
                    Line::new(ds.label.clone(), PlotPoints::from(points))
                        .color(ds.color)
                        .width(1.5),
                );
            }
        }
    });
}

fn y_axis_hints<'a>(
    axis: &AxisConfig,
    domain: Option<(f64, f64)>,
    fmt: TickFormatter,
) -> AxisHints<'a> {
    let placement = match axis.position {
        AxisPosition::Right => HPlacement::Right,
        _ => HPlacement::Left,
    };
    let tick = axis.tick_format;
    AxisHints::new_y()
        .placement(placement)
        .formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| match domain {
            Some((lo, hi)) => tick.label(lo + mark.value * (hi - lo), &fmt),
            None => String::new(),
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Candles
// ─────────────────────────────────────────────────────────────────────────────

fn show_candles(ui: &mut egui::Ui, desc: &ChartDescriptor, fmt: &TickFormatter, refit: bool) {
    let fmt = *fmt;
    let x_format = desc.x_axis.tick_format;
    let primary = desc.y_axes.first();
    let primary_grid = primary.map(|a| a.grid_lines).unwrap_or(true);

    let mut plot = Plot::new(("ivplot_candles", desc.variant.label()))
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .show_grid([desc.x_axis.grid_lines, primary_grid])
        .x_axis_formatter(move |mark, _range| x_format.label(mark.value, &fmt));
    if let Some(min) = primary.and_then(|a| a.suggested_min) {
        plot = plot.include_y(min);
    }
    plot = with_x_spacer(plot, x_format, &fmt);
    if refit {
        plot = plot.reset();
    }

    let Some(points) = desc.candles() else {
        return;
    };
    let name = desc
        .datasets
        .first()
        .map(|d| d.label.clone())
        .unwrap_or_default();

    plot.show(ui, |plot_ui| match desc.presentation.draw_type {
        DrawType::Candlestick => draw_candlesticks(plot_ui, &name, points, desc),
        DrawType::Bar => draw_ohlc_bars(plot_ui, &name, points, desc),
    });
}

fn draw_candlesticks(plot_ui: &mut PlotUi, name: &str, points: &[OhlcPoint], desc: &ChartDescriptor) {
    let body = desc.presentation.palette.colors();
    let outline = desc.presentation.border.outline();
    let elems: Vec<BoxElem> = points
        .iter()
        .filter_map(|p| {
            let (o, h, l, c) = (p.open?, p.high?, p.low?, p.close?);
            let (bottom, top) = if o <= c { (o, c) } else { (c, o) };
            let spread = BoxSpread::new(l, bottom, (bottom + top) / 2.0, top, h);
            Some(
                BoxElem::new(p.timestamp_seconds(), spread)
                    .box_width(CANDLE_WIDTH)
                    .whisker_width(0.0)
                    .fill(body.for_move(o, c))
                    .stroke(Stroke::new(1.0, outline.for_move(o, c))),
            )
        })
        .collect();
    plot_ui.box_plot(BoxPlot::new(name.to_string(), elems));
}

fn draw_ohlc_bars(plot_ui: &mut PlotUi, name: &str, points: &[OhlcPoint], desc: &ChartDescriptor) {
    let body = desc.presentation.palette.colors();
    let half = CANDLE_WIDTH / 2.0;
    for p in points {
        let (Some(o), Some(h), Some(l), Some(c)) = (p.open, p.high, p.low, p.close) else {
            continue;
        };
        let x = p.timestamp_seconds();
        let color: Color32 = body.for_move(o, c);
        let path = vec![[x - half, o], [x, o], [x, l], [x, h], [x, c], [x + half, c]];
        plot_ui.line(Line::new(name.to_string(), PlotPoints::from(path)).color(color));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// X grid spacing
// ─────────────────────────────────────────────────────────────────────────────

fn with_x_spacer<'a>(plot: Plot<'a>, format: TickFormat, fmt: &TickFormatter) -> Plot<'a> {
    let offset = f64::from(fmt.offset.local_minus_utc());
    match format {
        TickFormat::HourTick | TickFormat::TimeTick => {
            plot.x_grid_spacer(move |input| hour_marks(input, offset))
        }
        TickFormat::StrikeTick => plot.x_grid_spacer(strike_marks),
        _ => plot,
    }
}

/// Marks on whole local hours. The step is a multiple of two hours, so on a
/// dense axis every mark lands on an even local hour.
fn hour_marks(input: GridInput, offset_secs: f64) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let span_hours = ((hi - lo) / HOUR).max(1.0);
    let step_hours = if span_hours <= MAX_X_MARKS {
        1.0
    } else {
        2.0 * (span_hours / (2.0 * MAX_X_MARKS)).ceil()
    };
    aligned_marks(lo + offset_secs, hi + offset_secs, step_hours * HOUR)
        .into_iter()
        .map(|m| GridMark {
            value: m.value - offset_secs,
            step_size: m.step_size,
        })
        .collect()
}

fn strike_marks(input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let mut step = STRIKE_TICK_STEP;
    while (hi - lo) / step > MAX_X_MARKS {
        step *= 2.0;
    }
    aligned_marks(lo, hi, step)
}

fn aligned_marks(lo: f64, hi: f64, step: f64) -> Vec<GridMark> {
    if !(lo.is_finite() && hi.is_finite()) || step <= 0.0 || hi < lo {
        return Vec::new();
    }
    let mut marks = Vec::new();
    let mut value = (lo / step).ceil() * step;
    while value <= hi {
        marks.push(GridMark {
            value,
            step_size: step,
        });
        value += step;
    }
    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_marks_stay_on_multiples_of_250() {
        let marks = strike_marks(GridInput {
            bounds: (24_100.0, 26_900.0),
            base_step_size: 1.0,
        });
        assert!(!marks.is_empty());
        assert!(marks.iter().all(|m| m.value % 250.0 == 0.0));
    }

    #[test]
    fn hour_marks_land_on_even_local_hours() {
        let offset = 9.0 * HOUR;
        let lo = 1_700_000_000.0;
        let marks = hour_marks(
            GridInput {
                bounds: (lo, lo + 10.0 * 24.0 * HOUR),
                base_step_size: 1.0,
            },
            offset,
        );
        assert!(!marks.is_empty());
        for m in marks {
            let local_hours = ((m.value + offset) / HOUR).round() as i64;
            assert_eq!(local_hours % 2, 0);
        }
    }
}
