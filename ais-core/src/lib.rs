#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain types and offline conversions for reports received from the aisstream.io websocket
//! service.

mod batch;
mod error;
pub mod geojson;
mod models;
mod subscription;
pub mod table;

pub use batch::*;
pub use error::{CoordinateError, Error, ReportError, Result};
pub use models::*;
pub use subscription::*;
