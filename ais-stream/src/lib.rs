#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Implements a binary that subscribes to the aisstream.io websocket, appends every received report
//! to a newline-delimited json file and converts persisted batches to GeoJSON and CSV.

pub mod cli;
pub mod error;
pub mod session;
pub mod settings;
pub mod sink;
pub mod startup;
pub mod telemetry;
