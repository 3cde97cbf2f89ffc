#![deny(rust_2018_idioms)]

use ais_stream::settings::Settings;
use config::{Config, File};

pub mod format;
pub mod helper;
pub mod stream;

#[test]
fn test_default_settings_are_valid() {
    let settings = Config::builder()
        .add_source(File::with_name("config/ais-stream.yml").required(true))
        .set_override("api_key", "test")
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();

    assert_eq!(settings.api_key().unwrap(), "test");
    assert_eq!(settings.endpoint, "wss://stream.aisstream.io/v0/stream");
}

#[test]
fn test_settings_file_is_loaded_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yml");
    std::fs::write(&path, "api_key: abc\nendpoint: ws://localhost:1234\n").unwrap();

    let settings = Settings::new(Some(path.as_path())).unwrap();

    assert_eq!(settings.api_key().unwrap(), "abc");
    assert_eq!(settings.endpoint, "ws://localhost:1234");
    assert_eq!(settings.log_level, "info");
    assert!(!format!("{settings:?}").contains("abc"));
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Settings::new(Some(dir.path().join("missing.yml").as_path())).is_err());
}
