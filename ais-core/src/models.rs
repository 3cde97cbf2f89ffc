use crate::error::{
    ReportError,
    report_error::{InvalidPayloadSnafu, MissingPayloadSnafu, MissingShipNameSnafu},
};
use geo::{Point, coord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use std::fmt::Display;

/// Maritime Mobile Service Identity, the `UserID` of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(i32);

impl Mmsi {
    pub fn new(value: i32) -> Mmsi {
        Mmsi(value)
    }

    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The `MessageType` tag of an inbound report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    /// Class A position report (message types 1, 2 and 3).
    PositionReport,
    /// Class B position report (message type 18).
    StandardClassBPositionReport,
    /// Any other kind, kept verbatim.
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::PositionReport => "PositionReport",
            MessageKind::StandardClassBPositionReport => "StandardClassBPositionReport",
            MessageKind::Other(kind) => kind,
        }
    }
}

impl From<String> for MessageKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PositionReport" => MessageKind::PositionReport,
            "StandardClassBPositionReport" => MessageKind::StandardClassBPositionReport,
            _ => MessageKind::Other(value),
        }
    }
}

impl From<MessageKind> for String {
    fn from(value: MessageKind) -> Self {
        match value {
            MessageKind::Other(kind) => kind,
            v => v.as_str().to_string(),
        }
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sidecar data attached to every report by the upstream service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MetaData(Map<String, Value>);

impl MetaData {
    pub fn new(fields: Map<String, Value>) -> MetaData {
        MetaData(fields)
    }

    /// The display name of the vessel, if the upstream provided one.
    pub fn ship_name(&self) -> Option<&str> {
        self.0.get("ShipName").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A single report received from the stream.
///
/// The payload is kept as the upstream sent it so that reports of kinds we
/// do not model survive a persist-and-reload cycle untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AisReport {
    #[serde(rename = "MessageType")]
    pub message_type: MessageKind,
    #[serde(rename = "Message", default)]
    pub message: Map<String, Value>,
    #[serde(rename = "MetaData", default)]
    pub metadata: MetaData,
    /// Top-level keys outside the three we model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A report exactly as the upstream sent it, no field is required or dropped.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawReport(Map<String, Value>);

impl RawReport {
    pub fn new(fields: Map<String, Value>) -> RawReport {
        RawReport(fields)
    }

    /// The `MessageType` tag, if the upstream sent one.
    pub fn message_type(&self) -> Option<&str> {
        self.0.get("MessageType").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// The fields of a position report that the conversions need.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionReport {
    #[serde(rename = "UserID")]
    pub user_id: Mmsi,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Speed over ground in knots.
    #[serde(rename = "Sog")]
    pub sog: f64,
}

impl PositionReport {
    /// The position as a `geo` point, `x` being longitude.
    pub fn point(&self) -> Point<f64> {
        Point::from(coord! { x: self.longitude, y: self.latitude })
    }
}

impl AisReport {
    /// Reads the payload keyed by this report's kind as a [PositionReport].
    ///
    /// Both position kinds share the same payload shape, any other kind is
    /// expected to fail with [ReportError::MissingPayload] or
    /// [ReportError::InvalidPayload].
    pub fn position_report(&self) -> Result<PositionReport, ReportError> {
        let kind = self.message_type.as_str();
        let payload = self
            .message
            .get(kind)
            .context(MissingPayloadSnafu { kind })?;

        PositionReport::deserialize(payload).context(InvalidPayloadSnafu { kind })
    }

    pub fn ship_name(&self) -> Result<&str, ReportError> {
        self.metadata.ship_name().context(MissingShipNameSnafu)
    }
}

/// A decoded frame from the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// The upstream rejected something about the subscription.
    ServerError(String),
    Report(RawReport),
}

impl InboundFrame {
    /// Any json object without a non-null `error` key is a report, anything else that is not a
    /// json object fails to decode.
    pub fn decode(frame: &str) -> Result<InboundFrame, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_str(frame)?;

        let error = match fields.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(error)) => Some(error.clone()),
            Some(error) => Some(error.to_string()),
        };

        Ok(match error {
            Some(error) => InboundFrame::ServerError(error),
            None => InboundFrame::Report(RawReport(fields)),
        })
    }
}
