use ais_core::Coordinate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Listen for AIS from aisstream.io", long_about = None)]
pub struct Args {
    /// Settings file, defaults to `config/ais-stream.yml` when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Subscribe to the stream and append every report to `<outpath>.json`.
    Stream(StreamArgs),
    /// Convert a persisted batch to `<outpath>.geojson` and `<outpath>.csv`.
    Format(FormatArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct StreamArgs {
    /// Comma separated MMSIs to track.
    #[arg(long)]
    pub mmsi: Option<String>,

    /// North west corner of the geofence as `lat,lon`.
    #[arg(long, allow_hyphen_values = true, requires = "south_east")]
    pub north_west: Option<Coordinate>,

    /// South east corner of the geofence as `lat,lon`.
    #[arg(long, allow_hyphen_values = true, requires = "north_west")]
    pub south_east: Option<Coordinate>,

    /// Max number of messages to wait for.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Only subscribe to position reports.
    #[arg(long)]
    pub positions_only: bool,

    #[arg(long, default_value = "./ais_data/data")]
    pub outpath: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FormatArgs {
    #[arg(long, default_value = "./ais_data/data.json")]
    pub inpath: PathBuf,

    #[arg(long, default_value = "./ais_data/data")]
    pub outpath: PathBuf,

    /// Also produce one track line per vessel.
    #[arg(long)]
    pub trackline: bool,
}
