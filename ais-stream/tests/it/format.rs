use crate::helper::{TestHelper, position, static_data};
use ais_core::geojson::{FeatureCollection, Geometry};
use ais_stream::{cli::FormatArgs, error::Error, settings::Settings, startup::App};

#[tokio::test]
async fn test_streamed_batch_converts_to_geojson_and_csv() {
    let helper = TestHelper::new().await;

    helper.send_binary(position(111, 60.0, 5.0, 10.2, "SJARKEN"));
    helper.send_binary(static_data(111, "SJARKEN"));
    helper.send_binary(position(222, 61.0, 5.5, 3.1, "BRISLING"));
    helper.send_binary(position(111, 60.1, 5.1, 10.0, "SJARKEN"));
    helper.close();

    helper
        .app
        .stream(helper.stream_args("111,222", None))
        .await
        .unwrap();

    let outpath = helper.temp_dir.path().join("converted").join("data");
    helper
        .app
        .format(FormatArgs {
            inpath: helper.outpath().with_extension("json"),
            outpath: outpath.clone(),
            trackline: true,
        })
        .unwrap();

    let collection: FeatureCollection = serde_json::from_str(
        &std::fs::read_to_string(outpath.with_extension("geojson")).unwrap(),
    )
    .unwrap();
    assert_eq!(collection.features.len(), 5);
    assert_eq!(
        collection.features[3].geometry,
        Geometry::LineString {
            coordinates: vec![[5.0, 60.0], [5.1, 60.1]]
        }
    );

    let csv = std::fs::read_to_string(outpath.with_extension("csv")).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("MessageType,Message.PositionReport.Cog"));
    assert!(header.contains("MetaData.ShipName"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn test_missing_batch_is_a_convert_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::build(Settings {
        api_key: None,
        endpoint: String::new(),
        log_level: "info".to_string(),
    });

    let err = app
        .format(FormatArgs {
            inpath: dir.path().join("missing.json"),
            outpath: dir.path().join("data"),
            trackline: false,
        })
        .unwrap_err();

    assert!(matches!(err, Error::Convert { .. }));
    assert!(err.to_string().starts_with("Convert phase"));
}
