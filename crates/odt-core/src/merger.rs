//! Merge engine for combining several simulation tables into one

use crate::error::{Error, Result};
use crate::parser::read;
use crate::rename::TIME_COLUMN;
use crate::table::Table;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Name of the time axis column added by a time-aligned merge
pub const MERGED_TIME_COLUMN: &str = "tm";

/// Read and merge table files, in the order given.
///
/// Every file is read with canonical column names.
pub fn merge<P: AsRef<Path>>(paths: &[P], merge_time: bool) -> Result<Table> {
    if paths.is_empty() {
        return Err(Error::NoTables);
    }

    let mut tables: Vec<Table> = Vec::new();
    for path in paths {
        tables.push(read(path, true)?);
    }

    merge_tables(tables, merge_time)
}

/// Merge already parsed tables.
///
/// Without `merge_time` rows are stacked in input order. With it, rows are
/// aligned on the distinct values of the `t` column of every table.
pub fn merge_tables(tables: Vec<Table>, merge_time: bool) -> Result<Table> {
    if tables.is_empty() {
        return Err(Error::NoTables);
    }

    let merged = if merge_time {
        merge_on_time(&tables)?
    } else {
        stack(&tables)?
    };

    info!(
        "Merged {} tables into {} rows x {} columns",
        tables.len(),
        merged.row_count(),
        merged.column_count()
    );
    Ok(merged)
}

/// Append `second` after `first`, shifting the `x` column of `second` by
/// the last `x` value of `first`.
pub fn concat(first: &Table, second: &Table, x: &str) -> Result<Table> {
    let first_x = first
        .find_column(x)
        .ok_or_else(|| Error::ColumnNotFound(x.to_string()))?;
    let second_x = second
        .find_column(x)
        .ok_or_else(|| Error::ColumnNotFound(x.to_string()))?
        .index;

    let offset = first
        .rows
        .last()
        .map_or(0.0, |row| row.values[first_x.index]);

    let mut shifted = second.clone();
    for row in &mut shifted.rows {
        row.values[second_x] += offset;
    }

    stack(&[first.clone(), shifted])
}

/// Union of all column names, in first-seen order
fn union_columns(tables: &[Table]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for table in tables {
        for col in &table.columns {
            if seen.insert(col.name.as_str()) {
                names.push(col.name.clone());
            }
        }
    }

    names
}

/// Position of each of `table`'s columns in the merged column list.
///
/// Names are unique within a table (see [`Table::build`]), so no two
/// columns share a slot.
fn column_mapping(table: &Table, index: &HashMap<&str, usize>) -> Vec<usize> {
    table
        .columns
        .iter()
        .map(|c| index[c.name.as_str()])
        .collect()
}

/// Units for the merged columns: the first unit seen for each name.
///
/// A table without units makes the whole result unit-less.
fn merged_units(tables: &[Table], columns: &[String]) -> Option<Vec<String>> {
    let with_units = tables.iter().filter(|t| t.units.is_some()).count();
    if with_units < tables.len() {
        if with_units > 0 {
            warn!(
                "{} of {} tables carry no units, dropping units from the merge",
                tables.len() - with_units,
                tables.len()
            );
        }
        return None;
    }

    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for table in tables {
        if let Some(units) = &table.units {
            for (col, unit) in table.columns.iter().zip(units) {
                by_name.entry(col.name.as_str()).or_insert(unit.as_str());
            }
        }
    }

    Some(
        columns
            .iter()
            .map(|name| {
                let key = if name == MERGED_TIME_COLUMN {
                    TIME_COLUMN
                } else {
                    name.as_str()
                };
                by_name.get(key).map_or_else(String::new, |u| u.to_string())
            })
            .collect(),
    )
}

fn sources(tables: &[Table]) -> Vec<std::path::PathBuf> {
    tables
        .iter()
        .flat_map(|t| t.sources.iter().cloned())
        .collect()
}

/// Stack rows of all tables, filling absent columns with NaN
fn stack(tables: &[Table]) -> Result<Table> {
    let columns = union_columns(tables);
    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for table in tables {
        let mapping = column_mapping(table, &index);
        for row in &table.rows {
            let mut values = vec![f64::NAN; columns.len()];
            for (&target, &value) in mapping.iter().zip(&row.values) {
                values[target] = value;
            }
            rows.push(values);
        }
    }

    let units = merged_units(tables, &columns);
    Table::build(columns, rows, units, sources(tables))
}

/// One row per distinct time value, sorted ascending
fn merge_on_time(tables: &[Table]) -> Result<Table> {
    let mut time_index = Vec::with_capacity(tables.len());
    for table in tables {
        let col = table
            .find_column(TIME_COLUMN)
            .ok_or_else(|| Error::MissingTimeColumn {
                path: table.source_path().to_path_buf(),
            })?;
        if table.find_column(MERGED_TIME_COLUMN).is_some() {
            return Err(Error::ReservedColumn {
                path: table.source_path().to_path_buf(),
                name: MERGED_TIME_COLUMN.to_string(),
            });
        }
        time_index.push(col.index);
    }

    let mut times: Vec<f64> = Vec::new();
    let mut skipped = 0;
    for (table, &ti) in tables.iter().zip(&time_index) {
        for row in &table.rows {
            let t = row.values[ti];
            if t.is_nan() {
                skipped += 1;
            } else {
                times.push(t);
            }
        }
    }
    if skipped > 0 {
        warn!("Skipping {} rows with no time value", skipped);
    }
    times.sort_by(|a, b| a.total_cmp(b));
    times.dedup();

    let mut columns = vec![MERGED_TIME_COLUMN.to_string()];
    columns.extend(union_columns(tables));
    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut rows: Vec<Vec<f64>> = times
        .iter()
        .map(|&t| {
            let mut values = vec![f64::NAN; columns.len()];
            values[0] = t;
            values
        })
        .collect();

    for (table, &ti) in tables.iter().zip(&time_index) {
        let mapping = column_mapping(table, &index);
        for row in &table.rows {
            let t = row.values[ti];
            if t.is_nan() {
                continue;
            }
            let at = times.partition_point(|&p| p < t);
            let target_row = &mut rows[at];
            // later tables win; a NaN never replaces a value
            for (&target, &value) in mapping.iter().zip(&row.values) {
                if !value.is_nan() {
                    target_row[target] = value;
                }
            }
        }
    }

    let units = merged_units(tables, &columns);
    Table::build(columns, rows, units, sources(tables))
}
