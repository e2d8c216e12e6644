//! Parser for OOMMF data table (`.odt`) files
//!
//! Layout of the relevant lines:
//!
//! ```text
//! # ODT 1.0
//! # Table Start
//! # Title: mm
//! # Columns: Oxs_TimeDriver::{Simulation time} Oxs_TimeDriver::mx ...
//! # Units:            s                           {} ...
//!    1e-12   0.99 ...
//! # Table End
//! ```

use crate::error::{Error, Result};
use crate::parser::parse_number;
use crate::rename::odt_name;
use crate::table::Table;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

const COLUMNS_MARKER: &str = "# Columns:";
const UNITS_MARKER: &str = "# Units:";
const COMMENT: char = '#';

/// Module prefixes that start every column entry on the columns line
static MODULE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Oxs_|Anv_|Southampton_").expect("module prefix pattern is valid")
});

/// Header information collected from the comment lines
struct Header {
    columns: Vec<String>,
    units: Option<Vec<String>>,
    /// Index of the last columns line; data rows follow it
    data_start: usize,
}

fn scan_header(content: &str, path: &Path, rename: bool) -> Result<Header> {
    let mut columns_line = None;
    let mut units_line = None;

    for (i, line) in content.lines().enumerate() {
        if line.starts_with(COLUMNS_MARKER) {
            columns_line = Some((i, line));
        } else if line.starts_with(UNITS_MARKER) {
            units_line = Some(line);
        }
    }

    let (data_start, line) = columns_line.ok_or_else(|| Error::MissingHeader {
        path: path.to_path_buf(),
        marker: COLUMNS_MARKER.to_string(),
    })?;

    let columns = split_columns(line)
        .into_iter()
        .map(|raw| {
            if !rename {
                return Ok(raw);
            }
            odt_name(&raw)
                .map(|name| name.into_owned())
                .ok_or_else(|| Error::UnknownColumn {
                    path: path.to_path_buf(),
                    name: raw,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let units = units_line.map(split_units);

    debug!(
        "{}: {} columns, units {}, data from line {}",
        path.display(),
        columns.len(),
        if units.is_some() { "present" } else { "absent" },
        data_start + 1
    );

    Ok(Header {
        columns,
        units,
        data_start,
    })
}

/// Raw column names from a columns line, braces and whitespace removed
fn split_columns(line: &str) -> Vec<String> {
    MODULE_PREFIX
        .split(line)
        .skip(1)
        .map(|part| {
            part.chars()
                .filter(|c| !matches!(c, '{' | '}' | ' ' | '\n' | '\r'))
                .collect()
        })
        .collect()
}

/// Unit strings from a units line; `{}` becomes the empty unit
fn split_units(line: &str) -> Vec<String> {
    line.split_whitespace()
        .skip(2)
        .map(|u| u.replace(['{', '}'], ""))
        .collect()
}

fn data_rows(content: &str, path: &Path, start: usize) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, line) in content.lines().enumerate().skip(start) {
        if line.starts_with(COMMENT) || line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_number(token, path, i + 1))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Column names of an odt table, renamed to canonical names if `rename`
pub fn parse_columns_str(content: &str, path: &Path, rename: bool) -> Result<Vec<String>> {
    Ok(scan_header(content, path, rename)?.columns)
}

/// Column name to unit mapping of an odt table
pub fn parse_units_str(
    content: &str,
    path: &Path,
    rename: bool,
) -> Result<BTreeMap<String, String>> {
    let header = scan_header(content, path, rename)?;
    let units = header.units.ok_or_else(|| Error::MissingHeader {
        path: path.to_path_buf(),
        marker: UNITS_MARKER.to_string(),
    })?;

    if units.len() != header.columns.len() {
        return Err(Error::UnitCount {
            path: path.to_path_buf(),
            expected: header.columns.len(),
            found: units.len(),
        });
    }

    Ok(header.columns.into_iter().zip(units).collect())
}

/// Numeric rows following the last columns line
pub fn parse_rows_str(content: &str, path: &Path) -> Result<Vec<Vec<f64>>> {
    let start = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with(COLUMNS_MARKER))
        .map(|(i, _)| i)
        .last()
        .ok_or_else(|| Error::MissingHeader {
            path: path.to_path_buf(),
            marker: COLUMNS_MARKER.to_string(),
        })?;
    data_rows(content, path, start)
}

/// Parse a whole odt table
pub fn parse_str(content: &str, path: &Path, rename: bool) -> Result<Table> {
    let header = scan_header(content, path, rename)?;
    let rows = data_rows(content, path, header.data_start)?;
    Table::build(header.columns, rows, header.units, vec![path.to_path_buf()])
}
