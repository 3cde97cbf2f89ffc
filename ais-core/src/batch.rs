use crate::{
    AisReport,
    error::{Result, error::ReadBatchSnafu},
};
use snafu::ResultExt;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::{info, instrument};

/// Loads an entire persisted batch into memory, preserving file order.
#[instrument(skip_all, fields(app.path = %path.as_ref().display()))]
pub fn read_batch(path: impl AsRef<Path>) -> Result<Vec<AisReport>> {
    let file = File::open(path.as_ref())?;
    let reports = parse_batch(BufReader::new(file))?;

    info!("read {} report(s)", reports.len());

    Ok(reports)
}

/// Parses newline-delimited reports, blank lines are ignored.
pub fn parse_batch(reader: impl BufRead) -> Result<Vec<AisReport>> {
    let mut reports = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let report: AisReport =
            serde_json::from_str(&line).context(ReadBatchSnafu { line: idx + 1 })?;
        reports.push(report);
    }

    Ok(reports)
}
