mod common;

use common::{bare_meta_trend_body, trend_body, T0};
use ivplot::data::frame::decode;
use ivplot::data::series::{decode_with_meta, extract, split_meta, MetaLayout};
use ivplot::{ChartVariant, ExtractError};

#[test]
fn meta_row_is_removed_not_read_as_data() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    let frame = decode(&trend_body(T0 + 300));
    let rows = frame.len();

    let (meta, set) = extract(frame, &map).unwrap();
    let meta = meta.unwrap();
    assert_eq!(meta.updated_at_epoch_seconds, T0 + 300);
    assert_eq!(meta.atm_strike, None);

    assert_eq!(set.len(), rows - 1);
    for s in &set.series {
        assert_eq!(s.values.len(), rows - 1, "series {}", s.key);
    }
    assert_eq!(set.labels[0].as_deref(), Some(T0.to_string().as_str()));
}

#[test]
fn cells_pass_through_as_text_with_gaps() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    let (_, set) = extract(decode(&trend_body(T0)), &map).unwrap();

    let iv = set.get("atm_put_iv").unwrap();
    assert_eq!(
        iv.values,
        vec![Some("18.5".to_string()), None, Some("19.1".to_string())]
    );
    let pairs: Vec<_> = set.pairs("atm_put_price").unwrap().collect();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[2].1, &None);
}

#[test]
fn smile_meta_carries_the_atm_strike() {
    let body = format!("{T0},33000,,,,,,,\n32750,20.1,{T0},19.8,{T0},18.0,{T0},17.5,{T0}\n");
    let map = ChartVariant::SmileCurve.column_map().unwrap();
    let (meta, set) = extract(decode(&body), &map).unwrap();
    assert_eq!(meta.unwrap().atm_strike, Some(33000.0));
    assert_eq!(set.len(), 1);
    assert_eq!(set.series.len(), 8);
    assert_eq!(set.get("next_put_iv").unwrap().values[0].as_deref(), Some("17.5"));
}

#[test]
fn empty_frame_has_no_meta() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    assert_eq!(extract(decode(""), &map).unwrap_err(), ExtractError::MissingMeta);
}

#[test]
fn non_numeric_meta_is_reported() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    let err = extract(decode("soon,,\n1,2,3,4,5\n"), &map).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidMeta { field: "updated_at", .. }));
}

#[test]
fn meta_only_frame_yields_empty_series() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    let (meta, set) = extract(decode(&format!("{T0},,,,\n")), &map).unwrap();
    assert!(meta.is_some());
    assert!(set.is_empty());
}

#[test]
fn frames_without_meta_keep_every_row() {
    let frame = decode("1,2\n3,4\n");
    let (meta, rows) = split_meta(frame, MetaLayout::None).unwrap();
    assert!(meta.is_none());
    assert_eq!(rows.len(), 2);
}

#[test]
fn single_field_meta_line_is_not_taken_from_the_data() {
    let body = bare_meta_trend_body(T0 + 3600);
    let map = ChartVariant::AtmTrend.column_map().unwrap();

    let frame = decode_with_meta(&body, MetaLayout::UpdatedAt);
    assert_eq!(frame.len(), 3);

    let (meta, set) = extract(frame, &map).unwrap();
    assert_eq!(meta.unwrap().updated_at_epoch_seconds, T0 + 3600);
    assert_eq!(set.len(), 2);
    let labels: Vec<_> = set.labels.iter().map(|l| l.as_deref()).collect();
    assert_eq!(
        labels,
        vec![Some(T0.to_string().as_str()), Some((T0 + 3600).to_string().as_str())]
    );
}

#[test]
fn decode_with_meta_skips_leading_blank_lines() {
    let frame = decode_with_meta(&format!("\r\n\n{T0}\n1,2\n"), MetaLayout::UpdatedAt);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame.rows[0].len(), 1);
    assert_eq!(frame.rows[0].cell(0), Some(T0.to_string().as_str()));
}

#[test]
fn decode_with_meta_on_empty_text_has_no_meta() {
    let map = ChartVariant::AtmTrend.column_map().unwrap();
    let frame = decode_with_meta("\n", MetaLayout::UpdatedAt);
    assert!(frame.is_empty());
    assert_eq!(extract(frame, &map).unwrap_err(), ExtractError::MissingMeta);
}

#[test]
fn padded_and_bare_meta_lines_parse_alike() {
    let padded = ChartVariant::AtmTrend.parse_body(&trend_body(T0)).unwrap();
    let bare = ChartVariant::AtmTrend
        .parse_body(&bare_meta_trend_body(T0))
        .unwrap();
    assert_eq!(padded.len(), 3);
    assert_eq!(bare.len(), 2);
}
