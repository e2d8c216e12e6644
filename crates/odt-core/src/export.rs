//! Writing tables out as CSV or JSON

use crate::error::Result;
use crate::table::Table;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Output formats for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown format '{}', supported formats: csv, json",
                other
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Text form of a cell; missing values are empty
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}

/// Write a header row of column names followed by one record per row
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        csv_writer.write_record(row.values.iter().map(|&v| format_value(v)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the table as pretty-printed JSON; missing values become `null`
pub fn write_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a table to a file in the given format
pub fn export<P: AsRef<Path>>(table: &Table, path: P, format: ExportFormat) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(table, writer),
        ExportFormat::Json => write_json(table, writer),
    }
}
