mod common;

use common::{bare_meta_trend_body, candles_body, trend_body, MockTransport, BASE, T0};
use ivplot::{ChartVariant, FetchClient, FetchError, FetchedData, LookbackWindow, MAX_LOOKBACK_DAYS};

#[test]
fn lookback_window_bounds() {
    assert_eq!(LookbackWindow::try_new(100).unwrap().days(), 100);
    assert!(matches!(
        LookbackWindow::try_new(101),
        Err(FetchError::LookbackOutOfRange { requested: 101, max: 100 })
    ));
    assert_eq!(LookbackWindow::parse(" 30 ").unwrap().days(), 30);
    assert!(matches!(
        LookbackWindow::parse("ten"),
        Err(FetchError::InvalidLookback(_))
    ));
    assert!(matches!(
        LookbackWindow::parse("-3"),
        Err(FetchError::InvalidLookback(_))
    ));
    assert_eq!(LookbackWindow::default_for(ChartVariant::AtmIv).days(), 20);
    assert_eq!(LookbackWindow::default_for(ChartVariant::SmileCurve).days(), 10);
}

#[test]
fn request_url_uses_variant_path_and_days() {
    let client = FetchClient::new(MockTransport::new(), format!("{BASE}/"));
    let url = client.request_url(ChartVariant::AtmIv, LookbackWindow::try_new(20).unwrap());
    assert_eq!(url, format!("{BASE}/atm_iv_data?d=20"));
}

#[tokio::test]
async fn over_limit_lookback_makes_no_request() {
    let client = FetchClient::new(MockTransport::new(), BASE);
    let err = client
        .fetch(ChartVariant::AtmIv, MAX_LOOKBACK_DAYS + 1)
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn limit_lookback_makes_exactly_one_request() {
    let url = format!("{BASE}/atm_iv_data?d=100");
    let client = FetchClient::new(MockTransport::new().respond(&url, &candles_body(4, 20.0)), BASE);

    let data = client.fetch(ChartVariant::AtmIv, 100).await.unwrap();

    assert_eq!(client.transport().calls(), 1);
    assert_eq!(client.transport().urls(), vec![url]);
    match data {
        FetchedData::Candles(points) => assert_eq!(points.len(), 4),
        other => panic!("expected candles, got {other:?}"),
    }
}

#[tokio::test]
async fn line_variants_keep_meta() {
    let url = format!("{BASE}/atm_data?d=10");
    let client = FetchClient::new(MockTransport::new().respond(&url, &trend_body(T0)), BASE);

    match client.fetch(ChartVariant::AtmTrend, 10).await.unwrap() {
        FetchedData::Lines { meta, series } => {
            assert_eq!(meta.unwrap().updated_at_epoch_seconds, T0);
            assert_eq!(series.len(), 3);
        }
        other => panic!("expected lines, got {other:?}"),
    }
}

#[tokio::test]
async fn bare_meta_line_keeps_every_data_row() {
    let url = format!("{BASE}/atm_data?d=10");
    let body = bare_meta_trend_body(T0 + 3600);
    let client = FetchClient::new(MockTransport::new().respond(&url, &body), BASE);

    match client.fetch(ChartVariant::AtmTrend, 10).await.unwrap() {
        FetchedData::Lines { meta, series } => {
            assert_eq!(meta.unwrap().updated_at_epoch_seconds, T0 + 3600);
            assert_eq!(series.len(), 2);
            assert_eq!(series.labels[0].as_deref(), Some(T0.to_string().as_str()));
        }
        other => panic!("expected lines, got {other:?}"),
    }
}

#[tokio::test]
async fn http_errors_surface_as_status() {
    let url = format!("{BASE}/smile_data?d=10");
    let client = FetchClient::new(MockTransport::new().fail(&url, 401), BASE);

    let err = client.fetch(ChartVariant::SmileCurve, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 401, .. }));
    assert!(!err.is_rejection());
    assert_eq!(err.to_user_message(), "Data endpoint answered HTTP 401.");
}

#[tokio::test]
async fn empty_line_payload_is_an_extract_error() {
    let url = format!("{BASE}/atm_data?d=10");
    let client = FetchClient::new(MockTransport::new().respond(&url, "\n"), BASE);

    let err = client.fetch(ChartVariant::AtmTrend, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Extract(_)));
}
