//! Conversion of a batch of reports into a GeoJSON feature collection.
//!
//! Every position report becomes a point feature; optionally the positions
//! of each vessel are joined into one `LineString` track per vessel.

use crate::{
    AisReport, MessageKind, Mmsi,
    error::{Result, error::MalformedReportSnafu},
};
use geo::{LineString, Point};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Properties {
    Vessel(VesselProperties),
    Track(TrackProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselProperties {
    #[serde(rename = "MMSI")]
    pub mmsi: Mmsi,
    #[serde(rename = "ShipName")]
    pub ship_name: String,
    #[serde(rename = "Speed")]
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackType {
    Polyline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProperties {
    #[serde(rename = "Type")]
    pub track_type: TrackType,
    #[serde(rename = "MMSI")]
    pub mmsi: Mmsi,
}

/// GeoJSON geometry, coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

impl From<Point<f64>> for Geometry {
    fn from(point: Point<f64>) -> Self {
        Geometry::Point {
            coordinates: [point.x(), point.y()],
        }
    }
}

impl From<LineString<f64>> for Geometry {
    fn from(line: LineString<f64>) -> Self {
        Geometry::LineString {
            coordinates: line.into_inner().into_iter().map(|c| [c.x, c.y]).collect(),
        }
    }
}

impl Feature {
    pub fn vessel(mmsi: Mmsi, ship_name: impl Into<String>, speed: f64, point: Point<f64>) -> Self {
        Feature {
            properties: Properties::Vessel(VesselProperties {
                mmsi,
                ship_name: ship_name.into(),
                speed,
            }),
            geometry: point.into(),
        }
    }

    pub fn track(mmsi: Mmsi, line: LineString<f64>) -> Self {
        Feature {
            properties: Properties::Track(TrackProperties {
                track_type: TrackType::Polyline,
                mmsi,
            }),
            geometry: line.into(),
        }
    }

    pub fn is_track(&self) -> bool {
        matches!(self.properties, Properties::Track(_))
    }
}

/// Positions per vessel in arrival order, duplicates are kept.
///
/// Tracks are emitted in ascending MMSI order so repeated conversions of the
/// same batch yield identical output.
#[derive(Debug, Default)]
pub struct TrackAccumulator {
    tracks: BTreeMap<Mmsi, LineString<f64>>,
}

impl TrackAccumulator {
    pub fn push(&mut self, mmsi: Mmsi, point: Point<f64>) {
        self.tracks
            .entry(mmsi)
            .or_insert_with(|| LineString::new(vec![]))
            .0
            .push(point.into());
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn into_features(self) -> impl Iterator<Item = Feature> {
        self.tracks
            .into_iter()
            .map(|(mmsi, line)| Feature::track(mmsi, line))
    }
}

/// Only class A position reports are drawn, class B reports are skipped.
pub fn is_geojson_kind(kind: &MessageKind) -> bool {
    matches!(kind, MessageKind::PositionReport)
}

/// Converts `reports` into point features followed by, if requested, one
/// track line per vessel.
///
/// A report that matches [is_geojson_kind] but lacks any of the required
/// fields aborts the conversion with [crate::Error::MalformedReport].
#[instrument(skip(reports), fields(app.num_reports = reports.len()))]
pub fn transform(reports: &[AisReport], include_track_lines: bool) -> Result<FeatureCollection> {
    let mut features = Vec::new();
    let mut tracks = TrackAccumulator::default();

    for (index, report) in reports.iter().enumerate() {
        if !is_geojson_kind(&report.message_type) {
            continue;
        }

        let position = report
            .position_report()
            .context(MalformedReportSnafu { index })?;
        let ship_name = report.ship_name().context(MalformedReportSnafu { index })?;

        let point = position.point();
        features.push(Feature::vessel(
            position.user_id,
            ship_name,
            position.sog,
            point,
        ));

        if include_track_lines {
            tracks.push(position.user_id, point);
        }
    }

    let num_points = features.len();
    let num_tracks = tracks.len();
    features.extend(tracks.into_features());

    info!("converted {num_points} position(s) and {num_tracks} track(s)");

    Ok(FeatureCollection { features })
}

/// Writes `collection` as a single document, replacing any previous file.
pub fn write_feature_collection(
    path: impl AsRef<Path>,
    collection: &FeatureCollection,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, collection)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
