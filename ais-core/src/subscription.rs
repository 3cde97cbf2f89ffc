use crate::{
    MessageKind,
    error::{
        CoordinateError, Result,
        coordinate_error::{FormatSnafu, ParseFloatSnafu},
        error::InvalidSubscriptionSnafu,
    },
};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeTuple};
use snafu::ResultExt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }
}

/// Parses `"lat,lon"`, no range checks are applied.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let Some((lat, lon)) = value.split_once(',') else {
            return FormatSnafu { value }.fail();
        };

        let lat = lat.trim().parse().context(ParseFloatSnafu { value })?;
        let lon = lon.trim().parse().context(ParseFloatSnafu { value })?;

        Ok(Coordinate { lat, lon })
    }
}

/// A geofence given by two named corners.
///
/// The upstream expects `[[lat, lon], [lat, lon]]`, the corners are sent in
/// field order and exactly as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north_west: Coordinate,
    pub south_east: Coordinate,
}

impl BoundingBox {
    /// Covers the entire world, in the corner order the upstream expects.
    pub const GLOBAL: BoundingBox = BoundingBox {
        north_west: Coordinate {
            lat: -90.0,
            lon: -180.0,
        },
        south_east: Coordinate {
            lat: 90.0,
            lon: 180.0,
        },
    };

    pub fn new(north_west: Coordinate, south_east: Coordinate) -> BoundingBox {
        BoundingBox {
            north_west,
            south_east,
        }
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut corners = serializer.serialize_tuple(2)?;
        corners.serialize_element(&[self.north_west.lat, self.north_west.lon])?;
        corners.serialize_element(&[self.south_east.lat, self.south_east.lon])?;
        corners.end()
    }
}

/// The first frame sent on a stream, selecting what the upstream should forward.
#[derive(Clone, PartialEq, Serialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "APIKey")]
    api_key: String,
    #[serde(rename = "BoundingBoxes")]
    bounding_boxes: Vec<BoundingBox>,
    #[serde(rename = "FiltersShipMMSI", skip_serializing_if = "Option::is_none")]
    vessel_ids: Option<Vec<String>>,
    #[serde(rename = "FilterMessageTypes", skip_serializing_if = "Option::is_none")]
    message_kinds: Option<Vec<MessageKind>>,
}

impl SubscriptionRequest {
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_boxes[0]
    }

    pub fn vessel_ids(&self) -> Option<&[String]> {
        self.vessel_ids.as_deref()
    }

    pub fn message_kinds(&self) -> Option<&[MessageKind]> {
        self.message_kinds.as_deref()
    }

    /// Serializes the request into the wire frame.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl std::fmt::Debug for SubscriptionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRequest")
            .field("api_key", &"<redacted>")
            .field("bounding_boxes", &self.bounding_boxes)
            .field("vessel_ids", &self.vessel_ids)
            .field("message_kinds", &self.message_kinds)
            .finish()
    }
}

/// Builds a [SubscriptionRequest] targeting either a set of vessels or an area.
pub struct SubscriptionBuilder {
    api_key: String,
    vessel_ids: Option<Vec<String>>,
    bounding_box: Option<BoundingBox>,
    position_reports_only: bool,
}

impl SubscriptionBuilder {
    pub fn new(api_key: impl Into<String>) -> SubscriptionBuilder {
        SubscriptionBuilder {
            api_key: api_key.into(),
            vessel_ids: None,
            bounding_box: None,
            position_reports_only: false,
        }
    }

    pub fn vessel_ids<I, S>(mut self, ids: I) -> SubscriptionBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vessel_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Accepts a comma separated list such as `"111, 222"`.
    ///
    /// Elements are trimmed and empty elements dropped, duplicates are kept.
    pub fn vessel_ids_str(self, ids: &str) -> SubscriptionBuilder {
        self.vessel_ids(
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty()),
        )
    }

    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> SubscriptionBuilder {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn position_reports_only(mut self, position_reports_only: bool) -> SubscriptionBuilder {
        self.position_reports_only = position_reports_only;
        self
    }

    pub fn build(self) -> Result<SubscriptionRequest> {
        let (bounding_box, vessel_ids) = match (self.vessel_ids, self.bounding_box) {
            (Some(ids), None) => {
                if ids.is_empty() {
                    return InvalidSubscriptionSnafu {
                        reason: "the vessel identifier set is empty",
                    }
                    .fail();
                }
                // The upstream always requires a box, vessel filters are applied within it.
                (BoundingBox::GLOBAL, Some(ids))
            }
            (None, Some(bounding_box)) => (bounding_box, None),
            (None, None) => {
                return InvalidSubscriptionSnafu {
                    reason: "either vessel identifiers or a bounding box must be given",
                }
                .fail();
            }
            (Some(_), Some(_)) => {
                return InvalidSubscriptionSnafu {
                    reason: "vessel identifiers and a bounding box are mutually exclusive",
                }
                .fail();
            }
        };

        let message_kinds = self
            .position_reports_only
            .then(|| vec![MessageKind::PositionReport]);

        Ok(SubscriptionRequest {
            api_key: self.api_key,
            bounding_boxes: vec![bounding_box],
            vessel_ids,
            message_kinds,
        })
    }
}
