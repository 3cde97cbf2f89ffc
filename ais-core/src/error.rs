use snafu::{Location, Snafu};
use std::num::ParseFloatError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid subscription: {reason}"))]
    InvalidSubscription {
        #[snafu(implicit)]
        location: Location,
        reason: &'static str,
    },
    #[snafu(display("Malformed report at index {index}"))]
    MalformedReport {
        #[snafu(implicit)]
        location: Location,
        index: usize,
        source: ReportError,
    },
    #[snafu(display("Failed to decode line {line} of persisted batch"))]
    ReadBatch {
        #[snafu(implicit)]
        location: Location,
        line: usize,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("JSON error"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("IO error"))]
    Io {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("CSV error"))]
    Csv {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: csv::Error,
    },
}

/// Reasons a report of a known kind could not be read as that kind.
#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum ReportError {
    #[snafu(display("Message payload for '{kind}' is missing"))]
    MissingPayload {
        #[snafu(implicit)]
        location: Location,
        kind: String,
    },
    #[snafu(display("Message payload for '{kind}' is missing required fields"))]
    InvalidPayload {
        #[snafu(implicit)]
        location: Location,
        kind: String,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("MetaData is missing 'ShipName'"))]
    MissingShipName {
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum CoordinateError {
    #[snafu(display("Coordinate must be given as 'lat,lon', got '{value}'"))]
    Format {
        #[snafu(implicit)]
        location: Location,
        value: String,
    },
    #[snafu(display("Failed to parse coordinate part of '{value}'"))]
    ParseFloat {
        #[snafu(implicit)]
        location: Location,
        value: String,
        #[snafu(source)]
        error: ParseFloatError,
    },
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        Error::Io {
            location: caller_location(),
            error,
        }
    }
}

impl From<serde_json::Error> for Error {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            location: caller_location(),
            error,
        }
    }
}

impl From<csv::Error> for Error {
    #[track_caller]
    fn from(error: csv::Error) -> Self {
        Error::Csv {
            location: caller_location(),
            error,
        }
    }
}

#[track_caller]
fn caller_location() -> Location {
    let location = std::panic::Location::caller();
    Location::new(location.file(), location.line(), location.column())
}
