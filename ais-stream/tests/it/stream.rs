use crate::helper::{TestHelper, position, server_error, static_data};
use ais_core::{MessageKind, read_batch};
use ais_stream::{error::Error, session::SessionEnd, settings::Settings, startup::App};
use serde_json::json;

#[tokio::test]
async fn test_stream_persists_reports_until_limit() {
    let mut helper = TestHelper::new().await;

    helper.send_text(server_error());
    helper.send_binary(position(111, 60.0, 5.0, 10.2, "SJARKEN"));
    helper.send_text(static_data(222, "BRISLING"));
    helper.send_text(server_error());
    helper.send_binary(position(222, 61.0, 5.5, 3.1, "BRISLING"));
    helper.send_binary(position(111, 60.1, 5.1, 10.0, "SJARKEN"));

    let summary = helper
        .app
        .stream(helper.stream_args("111, 222", Some(3)))
        .await
        .unwrap();

    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.server_errors, 2);
    assert_eq!(summary.end, SessionEnd::Limit);

    let subscription = helper.subscription().await;
    assert_eq!(subscription["APIKey"], "test-key");
    assert_eq!(subscription["FiltersShipMMSI"], json!(["111", "222"]));

    let persisted = read_batch(helper.outpath().with_extension("json")).unwrap();
    let kinds = persisted
        .iter()
        .map(|r| r.message_type.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            MessageKind::PositionReport,
            MessageKind::Other("ShipStaticData".to_string()),
            MessageKind::PositionReport,
        ]
    );
    assert_eq!(
        serde_json::to_value(&persisted[1]).unwrap(),
        static_data(222, "BRISLING")
    );
}

#[tokio::test]
async fn test_stream_ends_when_upstream_closes() {
    let helper = TestHelper::new().await;

    helper.send_text(position(111, 60.0, 5.0, 10.2, "SJARKEN"));
    helper.close();

    let summary = helper
        .app
        .stream(helper.stream_args("111", None))
        .await
        .unwrap();

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.end, SessionEnd::EndOfStream);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_connect_error() {
    let helper = TestHelper::new().await;
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);
    assert_ne!(endpoint, helper.endpoint);

    let app = App::build(Settings {
        api_key: Some("test-key".to_string()),
        endpoint,
        log_level: "info".to_string(),
    });

    let err = app
        .stream(helper.stream_args("111", Some(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Connect { .. }));
    assert!(err.to_string().starts_with("Connect phase"));
}

#[tokio::test]
async fn test_missing_api_key_fails_before_connecting() {
    let helper = TestHelper::new().await;

    let app = App::build(Settings {
        api_key: None,
        endpoint: helper.endpoint.clone(),
        log_level: "info".to_string(),
    });

    let err = app
        .stream(helper.stream_args("111", Some(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingSetting { .. }));
}
