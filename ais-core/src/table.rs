//! Flattening of position reports into a CSV table.

use crate::{AisReport, MessageKind, error::Result};
use itertools::Itertools;
use serde_json::Value;
use std::{fs::File, io::Write, path::Path};
use tracing::{info, instrument};

const COLUMN_SEPARATOR: &str = ".";

/// Column oriented rows of flattened reports, missing values are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Writes a header row followed by one record per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| format_cell(cell.as_ref())))?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Writes the table to `path`, replacing any previous file.
    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

fn format_cell(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

/// Both position kinds are exported.
pub fn is_tabular_kind(kind: &MessageKind) -> bool {
    matches!(
        kind,
        MessageKind::PositionReport | MessageKind::StandardClassBPositionReport
    )
}

/// Flattens every position report into rows keyed by `.`-joined field paths.
///
/// Array valued fields are exploded one column at a time, so a row holding
/// several arrays fans out into the cross product of their lengths rather
/// than an element-wise pairing. An empty array yields a single empty cell.
#[instrument(skip(reports), fields(app.num_reports = reports.len()))]
pub fn export(reports: &[AisReport]) -> Result<Table> {
    let mut columns: Vec<String> = Vec::new();
    let mut flattened = Vec::new();

    for report in reports.iter().filter(|r| is_tabular_kind(&r.message_type)) {
        let mut fields = Vec::new();
        flatten(None, serde_json::to_value(report)?, &mut fields);

        for (name, _) in &fields {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        flattened.push(fields);
    }

    let mut rows = Vec::new();
    for fields in flattened {
        let cells = columns
            .iter()
            .map(|column| {
                let value = fields
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, v)| v.clone());
                explode(value)
            })
            .collect::<Vec<_>>();

        rows.extend(cells.into_iter().multi_cartesian_product());
    }

    info!("exported {} row(s) across {} column(s)", rows.len(), columns.len());

    Ok(Table { columns, rows })
}

fn flatten(prefix: Option<&str>, value: Value, out: &mut Vec<(String, Value)>) {
    match (prefix, value) {
        (prefix, Value::Object(map)) => {
            for (key, value) in map {
                let name = match prefix {
                    Some(prefix) => format!("{prefix}{COLUMN_SEPARATOR}{key}"),
                    None => key,
                };
                flatten(Some(&name), value, out);
            }
        }
        (Some(prefix), value) => out.push((prefix.to_string(), value)),
        (None, _) => {}
    }
}

fn explode(value: Option<Value>) -> Vec<Option<Value>> {
    match value {
        Some(Value::Array(items)) if items.is_empty() => vec![None],
        Some(Value::Array(items)) => items.into_iter().map(Some).collect(),
        v => vec![v],
    }
}
