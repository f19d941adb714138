mod common;

use common::{candles_body, trend_body, T0};
use ivplot::chart::{render, update, AxisId, DatasetData, DrawType, Presentation};
use ivplot::color_scheme::{BorderMode, CandlePalette};
use ivplot::data::frame::decode;
use ivplot::{ChartVariant, FetchedData, TickFormatter};

fn tokyo() -> TickFormatter {
    TickFormatter::with_offset_minutes(540)
}

fn trend(updated_at: i64) -> FetchedData {
    ChartVariant::AtmTrend
        .interpret(decode(&trend_body(updated_at)))
        .unwrap()
}

#[test]
fn render_builds_title_axes_and_datasets() {
    let desc = render(ChartVariant::AtmTrend, trend(T0 + 300), Presentation::default(), &tokyo());

    assert_eq!(desc.title, "ATM option parameters (1/1 9:05 updated)");
    assert_eq!(desc.revision, 0);
    assert_eq!(desc.labels.len(), 3);
    assert_eq!(desc.y_axes.len(), 3);
    assert!(desc.y_axis(AxisId::Y1).unwrap().grid_lines);
    assert!(!desc.y_axis(AxisId::Y2).unwrap().grid_lines);
    assert!(!desc.y_axis(AxisId::Y3).unwrap().grid_lines);
    assert!(!desc.x_axis.grid_lines);
    assert!(desc.dataset("aux").unwrap().hidden);
}

#[test]
fn gaps_break_lines_instead_of_interpolating() {
    let desc = render(ChartVariant::AtmTrend, trend(T0), Presentation::default(), &tokyo());
    let iv = desc.dataset("atm_put_iv").unwrap();

    assert_eq!(
        iv.data,
        DatasetData::Line(vec![Some(18.5), None, Some(19.1)])
    );
    let segments = iv.line_segments(&desc.labels);
    assert_eq!(
        segments,
        vec![vec![[T0 as f64, 18.5]], vec![[(T0 + 7200) as f64, 19.1]]]
    );
}

#[test]
fn axes_are_scaled_independently() {
    let desc = render(ChartVariant::AtmTrend, trend(T0), Presentation::default(), &tokyo());
    // the hidden aux series on y1 does not widen the strike axis
    assert_eq!(
        desc.y_axis(AxisId::Y1).unwrap().domain(&desc.datasets),
        Some((33000.0, 33250.0))
    );
    assert_eq!(
        desc.y_axis(AxisId::Y2).unwrap().domain(&desc.datasets),
        Some((18.5, 19.1))
    );
    assert_eq!(
        desc.y_axis(AxisId::Y3).unwrap().domain(&desc.datasets),
        Some((415.0, 420.0))
    );
}

#[test]
fn update_twice_with_same_data_is_idempotent() {
    let mut desc = render(ChartVariant::AtmTrend, trend(T0), Presentation::default(), &tokyo());

    update(&mut desc, trend(T0));
    let once = (desc.labels.clone(), desc.datasets.clone());
    update(&mut desc, trend(T0));

    assert_eq!((desc.labels.clone(), desc.datasets.clone()), once);
    assert_eq!(desc.labels.len(), 3);
    assert_eq!(desc.revision, 2);
    assert_eq!(desc.data_revision, 2);
}

#[test]
fn update_keeps_the_initial_title() {
    let mut desc = render(ChartVariant::AtmTrend, trend(T0), Presentation::default(), &tokyo());
    let title = desc.title.clone();
    update(&mut desc, trend(T0 + 86_400));
    assert_eq!(desc.title, title);
}

#[test]
fn smile_title_and_axes() {
    let body = format!("{T0},33000,,,,,,,\n32750,20.1,{T0},19.8,{T0},18.0,{T0},17.5,{T0}\n");
    let data = ChartVariant::SmileCurve.interpret(decode(&body)).unwrap();
    let desc = render(ChartVariant::SmileCurve, data, Presentation::default(), &tokyo());

    assert_eq!(desc.title, "Smile curve (1/1 9:00) ATM = 33000");
    assert!(desc.x_axis.grid_lines);
    assert_eq!(desc.y_axes.len(), 2);
    assert_eq!(desc.datasets.len(), 8);
    assert_eq!(desc.labels, vec![Some(32750.0)]);
}

#[test]
fn candles_replace_points_and_honour_suggested_min() {
    let data = ChartVariant::AtmIv.interpret(decode(&candles_body(3, 20.0))).unwrap();
    let mut desc = render(ChartVariant::AtmIv, data, Presentation::default(), &tokyo());

    assert_eq!(desc.title, "ATM option IV");
    assert_eq!(desc.candles().unwrap().len(), 3);
    assert_eq!(
        desc.y_axis(AxisId::Y1).unwrap().domain(&desc.datasets),
        Some((13.0, 21.0))
    );

    let newer = ChartVariant::AtmIv.interpret(decode(&candles_body(2, 16.0))).unwrap();
    update(&mut desc, newer);
    let candles = desc.candles().unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].close, Some(16.0));
}

#[test]
fn presentation_change_bumps_revision_once() {
    let data = ChartVariant::AtmIv.interpret(decode(&candles_body(1, 20.0))).unwrap();
    let mut desc = render(ChartVariant::AtmIv, data, Presentation::default(), &tokyo());
    let styled = Presentation {
        draw_type: DrawType::Bar,
        palette: CandlePalette::Neon,
        border: BorderMode::Hidden,
    };

    desc.apply_presentation(styled);
    desc.apply_presentation(styled);

    assert_eq!(desc.presentation, styled);
    assert_eq!(desc.revision, 1);
}

#[test]
fn restyle_keeps_data_revision_so_zoom_survives() {
    let data = ChartVariant::AtmIv.interpret(decode(&candles_body(2, 20.0))).unwrap();
    let mut desc = render(ChartVariant::AtmIv, data, Presentation::default(), &tokyo());
    assert_eq!(desc.data_revision, 0);

    desc.apply_presentation(Presentation {
        draw_type: DrawType::Bar,
        ..Presentation::default()
    });
    desc.touch();
    assert_eq!(desc.revision, 2);
    assert_eq!(desc.data_revision, 0);

    let newer = ChartVariant::AtmIv.interpret(decode(&candles_body(2, 18.0))).unwrap();
    update(&mut desc, newer);
    assert_eq!(desc.revision, 3);
    assert_eq!(desc.data_revision, 1);
}

#[test]
fn mismatched_data_is_ignored() {
    let data = ChartVariant::AtmIv.interpret(decode(&candles_body(2, 20.0))).unwrap();
    let mut desc = render(ChartVariant::AtmIv, data, Presentation::default(), &tokyo());
    update(&mut desc, trend(T0));
    assert_eq!(desc.candles().unwrap().len(), 2);
}
