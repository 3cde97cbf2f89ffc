use snafu::{Location, Snafu};
use std::path::PathBuf;
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

/// Every fatal error names the phase of the run it occurred in.
#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Configuration phase: failed to load settings"))]
    Settings {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: config::ConfigError,
    },
    #[snafu(display("Configuration phase: '{key}' is not set"))]
    MissingSetting {
        #[snafu(implicit)]
        location: Location,
        key: &'static str,
    },
    #[snafu(display("Subscribe phase: invalid subscription request"))]
    InvalidSubscription {
        #[snafu(implicit)]
        location: Location,
        source: ais_core::Error,
    },
    #[snafu(display("Connect phase: failed to connect to '{endpoint}'"))]
    Connect {
        #[snafu(implicit)]
        location: Location,
        endpoint: String,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Subscribe phase: failed to send subscription request"))]
    Subscribe {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Receive phase: stream transport failed"))]
    Receive {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Receive phase: failed to persist reports to '{}'", path.display()))]
    Persist {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Convert phase: failed while {stage}"))]
    Convert {
        #[snafu(implicit)]
        location: Location,
        stage: &'static str,
        source: ais_core::Error,
    },
}
