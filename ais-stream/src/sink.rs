use crate::error::{Result, error::PersistSnafu};
use ais_core::RawReport;
use async_trait::async_trait;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Destination for reports accepted by a stream session.
#[async_trait]
pub trait ReportSink: Send {
    async fn append(&mut self, report: &RawReport) -> Result<()>;
}

/// Appends each report as one line of json, every key the upstream sent is kept.
///
/// The file is opened and released for every report, nothing is compacted and a failed write
/// may leave a partial line behind.
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> JsonLinesSink {
        JsonLinesSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportSink for JsonLinesSink {
    async fn append(&mut self, report: &RawReport) -> Result<()> {
        let path = &self.path;

        let mut record = serde_json::to_vec(report)
            .map_err(std::io::Error::from)
            .context(PersistSnafu { path })?;
        record.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .context(PersistSnafu { path })?;

        file.write_all(&record)
            .await
            .context(PersistSnafu { path })?;
        file.flush().await.context(PersistSnafu { path })?;

        Ok(())
    }
}
