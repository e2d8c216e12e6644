//! File-level entry points dispatching to the odt and mumax parsers

use crate::error::{Error, Result};
use crate::format::{Format, ReadOptions};
use crate::table::Table;
use crate::{mumax, odt};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a whole table file into memory
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse one data token, reporting the 1-based file line on failure
pub(crate) fn parse_number(token: &str, path: &Path, line: usize) -> Result<f64> {
    token.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        path: path.to_path_buf(),
        line,
        token: token.to_string(),
    })
}

/// Extract the column names of a table file
pub fn parse_columns<P: AsRef<Path>>(path: P, rename: bool) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = read_file(path)?;

    match ReadOptions::rename(rename).resolve_format(path, &content) {
        Format::Odt => odt::parse_columns_str(&content, path, rename),
        Format::Mumax => mumax::parse_columns_str(&content, path, rename),
    }
}

/// Extract the column name to unit mapping of an odt file
pub fn parse_units<P: AsRef<Path>>(path: P, rename: bool) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let content = read_file(path)?;

    match ReadOptions::rename(rename).resolve_format(path, &content) {
        Format::Odt => odt::parse_units_str(&content, path, rename),
        Format::Mumax => Err(Error::UnitsUnavailable {
            path: path.to_path_buf(),
        }),
    }
}

/// Extract the numeric rows of a table file
pub fn parse_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let content = read_file(path)?;

    match ReadOptions::default().resolve_format(path, &content) {
        Format::Odt => odt::parse_rows_str(&content, path),
        Format::Mumax => mumax::parse_rows_str(&content, path),
    }
}

/// Read a table file, detecting its format
pub fn read<P: AsRef<Path>>(path: P, rename: bool) -> Result<Table> {
    read_with(path, ReadOptions::rename(rename))
}

/// Read a table file with explicit options
pub fn read_with<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Table> {
    let path = path.as_ref();
    let content = read_file(path)?;
    parse_content(&content, path, options)
}

/// Parse table text (useful for testing)
pub fn parse_str(content: &str, source_name: &str, options: ReadOptions) -> Result<Table> {
    let path = PathBuf::from(source_name);
    parse_content(content, &path, options)
}

fn parse_content(content: &str, path: &Path, options: ReadOptions) -> Result<Table> {
    let format = options.resolve_format(path, content);
    debug!("Parsing {} as {}", path.display(), format.name());

    let table = match format {
        Format::Odt => odt::parse_str(content, path, options.rename)?,
        Format::Mumax => mumax::parse_str(content, path, options.rename)?,
    };

    debug!(
        "{}: {} rows x {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}
