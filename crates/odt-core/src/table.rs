//! Core table types for representing simulation output

use crate::error::{Error, Result};
use crate::fourier::FourierSpace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// A table of floating-point columns parsed from one or more files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data, one value per column
    pub rows: Vec<Row>,
    /// Unit per column, aligned with `columns`
    pub units: Option<Vec<String>>,
    /// Files that contributed to this table, in read order
    pub sources: Vec<PathBuf>,
    /// Independent variable column, if one is set
    #[serde(default)]
    pub x: Option<String>,
    /// Present on tables produced by [`Table::rfft`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fourier: Option<FourierSpace>,
}

impl Table {
    /// Assemble a table from parsed parts, checking column names as well as
    /// row and unit lengths.
    ///
    /// Row numbers in errors are 1-based positions in `rows`.
    pub fn build(
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
        units: Option<Vec<String>>,
        sources: Vec<PathBuf>,
    ) -> Result<Self> {
        let origin = sources.first().cloned().unwrap_or_default();

        let mut seen = HashSet::new();
        if let Some(name) = columns.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(Error::DuplicateColumn {
                path: origin,
                name: name.clone(),
            });
        }

        if let Some(units) = &units {
            if units.len() != columns.len() {
                return Err(Error::UnitCount {
                    path: origin,
                    expected: columns.len(),
                    found: units.len(),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RowLength {
                    path: origin,
                    row: i + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Self {
            columns: columns
                .into_iter()
                .enumerate()
                .map(|(i, name)| Column::new(name, i))
                .collect(),
            rows: rows.into_iter().map(Row::new).collect(),
            units,
            sources,
            x: None,
            fourier: None,
        })
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All values of a named column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.find_column(name)?;
        Some(self.rows.iter().map(|r| r.values[col.index]).collect())
    }

    /// Unit of a named column, if the table carries units
    pub fn unit(&self, name: &str) -> Option<&str> {
        let col = self.find_column(name)?;
        self.units
            .as_ref()
            .and_then(|u| u.get(col.index))
            .map(String::as_str)
    }

    /// Column name to unit mapping, if the table carries units
    pub fn units_map(&self) -> Option<BTreeMap<String, String>> {
        let units = self.units.as_ref()?;
        Some(
            self.columns
                .iter()
                .zip(units)
                .map(|(c, u)| (c.name.clone(), u.clone()))
                .collect(),
        )
    }

    /// The first file this table was read from
    pub fn source_path(&self) -> &Path {
        self.sources.first().map_or(Path::new(""), PathBuf::as_path)
    }

    /// Set the independent variable, or clear it with `None`
    pub fn set_x(&mut self, x: Option<&str>) -> Result<()> {
        if let Some(name) = x {
            if self.find_column(name).is_none() {
                return Err(Error::ColumnNotFound(name.to_string()));
            }
        }
        self.x = x.map(str::to_string);
        Ok(())
    }

    /// Builder form of [`Table::set_x`]
    pub fn with_x(mut self, x: &str) -> Result<Self> {
        self.set_x(Some(x))?;
        Ok(self)
    }

    /// Dependent variables: every column except `x`
    pub fn y(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| Some(*name) != self.x.as_deref())
            .collect()
    }

    /// Last value of the independent variable
    pub fn xmax(&self) -> Result<f64> {
        let x = self.x.as_deref().ok_or(Error::NoIndependentVariable)?;
        let values = self.values_of(x)?;
        values.last().copied().ok_or_else(|| Error::TooFewRows {
            column: x.to_string(),
            needed: 1,
            found: 0,
        })
    }

    /// Spacing of the independent variable, which must be even
    pub fn dx(&self) -> Result<f64> {
        let x = self.x.as_deref().ok_or(Error::NoIndependentVariable)?;
        self.spacing(x)
    }

    /// Even spacing of column `x`.
    ///
    /// The largest and smallest steps must agree to a relative tolerance of
    /// 1e-5.
    pub(crate) fn spacing(&self, x: &str) -> Result<f64> {
        let values = self.values_of(x)?;
        if values.len() < 2 {
            return Err(Error::TooFewRows {
                column: x.to_string(),
                needed: 2,
                found: values.len(),
            });
        }

        let steps: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let max = steps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = steps.iter().copied().fold(f64::INFINITY, f64::min);

        if (max - min).abs() <= SPACING_RTOL * max.abs().max(min.abs()) {
            Ok(steps[0])
        } else {
            Err(Error::UnevenSpacing {
                column: x.to_string(),
            })
        }
    }

    /// Apply `func` to every value of the chosen columns, `y` by default
    pub fn apply<F>(&self, func: F, columns: Option<&[&str]>) -> Result<Table>
    where
        F: Fn(f64) -> f64,
    {
        let targets: Vec<usize> = match columns {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.find_column(name)
                        .map(|c| c.index)
                        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
                })
                .collect::<Result<_>>()?,
            None => self
                .columns
                .iter()
                .filter(|c| Some(c.name.as_str()) != self.x.as_deref())
                .map(|c| c.index)
                .collect(),
        };

        let mut applied = self.clone();
        for row in &mut applied.rows {
            for &i in &targets {
                row.values[i] = func(row.values[i]);
            }
        }
        Ok(applied)
    }

    /// Whether this table holds a Fourier transform
    pub fn is_fourierspace(&self) -> bool {
        self.fourier.is_some()
    }

    /// Real FFT of the `y` columns against `x`.
    ///
    /// Both default to the table's own `x` and `y`.
    pub fn rfft(&self, x: Option<&str>, y: Option<&[&str]>) -> Result<Table> {
        crate::fourier::rfft(self, x, y)
    }

    /// Inverse of [`Table::rfft`], back to a table over `t`
    pub fn irfft(&self, x: Option<&str>, y: Option<&[&str]>) -> Result<Table> {
        crate::fourier::irfft(self, x, y)
    }

    pub(crate) fn values_of(&self, name: &str) -> Result<Vec<f64>> {
        self.column_values(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Append `other` after this table, shifting its `x` column so it
    /// continues from the last `x` value here.
    pub fn concat(&self, other: &Table, x: &str) -> Result<Table> {
        crate::merger::concat(self, other, x)
    }
}

const SPACING_RTOL: f64 = 1e-5;

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name (e.g., "t" or "TimeDriver::Simulationtime")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// One value per column; NaN marks a missing value
    pub values: Vec<f64>,
}

impl Row {
    /// Create a new row
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_table() {
        let table = Table::build(
            names(&["t", "mx"]),
            vec![vec![1e-12, 0.5], vec![2e-12, 0.6]],
            Some(names(&["s", ""])),
            vec![PathBuf::from("run.odt")],
        )
        .unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].index, 1);
        assert_eq!(table.column_values("mx"), Some(vec![0.5, 0.6]));
        assert_eq!(table.unit("t"), Some("s"));
        assert_eq!(table.unit("mx"), Some(""));
        assert_eq!(table.source_path(), Path::new("run.odt"));
    }

    #[test]
    fn test_build_rejects_short_row() {
        let err = Table::build(
            names(&["t", "mx", "my"]),
            vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]],
            None,
            vec![PathBuf::from("bad.odt")],
        )
        .unwrap_err();

        match err {
            Error::RowLength {
                row,
                expected,
                found,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_rejects_unit_count() {
        let err = Table::build(
            names(&["t", "mx"]),
            vec![],
            Some(names(&["s"])),
            vec![PathBuf::from("bad.odt")],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::UnitCount {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_units_map_absent_without_units() {
        let table = Table::build(names(&["t"]), vec![vec![0.0]], None, vec![]).unwrap();
        assert!(table.units_map().is_none());
        assert!(table.unit("t").is_none());
        assert_eq!(table.source_path(), Path::new(""));
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let err = Table::build(
            names(&["t", "max_spin_angle", "max_spin_angle"]),
            vec![vec![1.0, 2.0, 3.0]],
            None,
            vec![PathBuf::from("exchange.odt")],
        )
        .unwrap_err();

        match err {
            Error::DuplicateColumn { path, name } => {
                assert_eq!(path, PathBuf::from("exchange.odt"));
                assert_eq!(name, "max_spin_angle");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn ramp() -> Table {
        Table::build(
            names(&["t", "mx", "E"]),
            vec![
                vec![0.0, 0.5, -1.0],
                vec![1e-12, -0.25, -2.0],
                vec![2e-12, 0.125, -3.0],
            ],
            Some(names(&["s", "", "J"])),
            vec![PathBuf::from("run.odt")],
        )
        .unwrap()
    }

    #[test]
    fn test_independent_variable() {
        let mut table = ramp();
        assert!(table.x.is_none());
        assert_eq!(table.y(), vec!["t", "mx", "E"]);
        assert!(matches!(table.dx(), Err(Error::NoIndependentVariable)));
        assert!(matches!(table.xmax(), Err(Error::NoIndependentVariable)));

        table.set_x(Some("t")).unwrap();
        assert_eq!(table.y(), vec!["mx", "E"]);
        assert_eq!(table.xmax().unwrap(), 2e-12);
        assert!((table.dx().unwrap() - 1e-12).abs() < 1e-24);

        let err = table.set_x(Some("iteration")).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "iteration"));
        assert_eq!(table.x.as_deref(), Some("t"));

        table.set_x(None).unwrap();
        assert!(table.x.is_none());
    }

    #[test]
    fn test_dx_uneven_spacing() {
        let table = Table::build(
            names(&["t", "mx"]),
            vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![3.0, 1.0]],
            None,
            vec![],
        )
        .unwrap()
        .with_x("t")
        .unwrap();

        assert!(matches!(table.dx(), Err(Error::UnevenSpacing { column }) if column == "t"));
    }

    #[test]
    fn test_dx_needs_two_rows() {
        let table = Table::build(names(&["t"]), vec![vec![0.0]], None, vec![])
            .unwrap()
            .with_x("t")
            .unwrap();

        assert!(matches!(
            table.dx(),
            Err(Error::TooFewRows {
                needed: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_apply_defaults_to_y() {
        let table = ramp().with_x("t").unwrap();
        let applied = table.apply(f64::abs, None).unwrap();

        assert_eq!(applied.column_values("t"), table.column_values("t"));
        assert_eq!(applied.column_values("mx"), Some(vec![0.5, 0.25, 0.125]));
        assert_eq!(applied.column_values("E"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(applied.x.as_deref(), Some("t"));
        assert_eq!(applied.units, table.units);
    }

    #[test]
    fn test_apply_selected_columns() {
        let table = ramp();
        let applied = table.apply(|v| v * 2.0, Some(&["E"])).unwrap();

        assert_eq!(applied.column_values("mx"), table.column_values("mx"));
        assert_eq!(applied.column_values("E"), Some(vec![-2.0, -4.0, -6.0]));

        let err = table.apply(f64::abs, Some(&["my"])).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "my"));
    }

    #[test]
    fn test_find_missing_column() {
        let table = Table::build(names(&["t"]), vec![], None, vec![]).unwrap();
        assert!(table.find_column("mx").is_none());
        assert!(table.column_values("mx").is_none());
    }
}
