//! Parser for mumax3 `table.txt` files
//!
//! The first line is the header, e.g. `# t (s)\tmx ()\tmy ()\tmz ()`;
//! every other non-comment line is one tab-separated row.

use crate::error::{Error, Result};
use crate::parser::parse_number;
use crate::rename::mumax_name;
use crate::table::Table;
use std::path::Path;

const COMMENT: char = '#';

fn header_line<'a>(content: &'a str, path: &Path) -> Result<&'a str> {
    content.lines().next().ok_or_else(|| Error::MissingHeader {
        path: path.to_path_buf(),
        marker: "#".to_string(),
    })
}

/// Column names from the header line, discarding the unit annotations
fn split_columns(header: &str, rename: bool) -> Vec<String> {
    // drop the leading "# "
    let body = header.char_indices().nth(2).map_or("", |(i, _)| &header[i..]);

    body.trim_end()
        .split('\t')
        .map(|token| {
            let raw = token.split(' ').next().unwrap_or(token);
            if rename {
                mumax_name(raw).to_string()
            } else {
                raw.to_string()
            }
        })
        .collect()
}

/// Column names of a mumax3 table, renamed to canonical names if `rename`.
///
/// Names missing from the lookup table are kept as they are.
pub fn parse_columns_str(content: &str, path: &Path, rename: bool) -> Result<Vec<String>> {
    Ok(split_columns(header_line(content, path)?, rename))
}

/// Numeric rows of a mumax3 table
pub fn parse_rows_str(content: &str, path: &Path) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.starts_with(COMMENT) || line.trim().is_empty() {
            continue;
        }
        let row = line
            .trim_end()
            .split('\t')
            .map(|token| parse_number(token, path, i + 1))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a whole mumax3 table; the result carries no units
pub fn parse_str(content: &str, path: &Path, rename: bool) -> Result<Table> {
    let columns = parse_columns_str(content, path, rename)?;
    let rows = parse_rows_str(content, path)?;
    Table::build(columns, rows, None, vec![path.to_path_buf()])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "# t (s)\tmx ()\tmy ()\tmz ()\tE_total (J)\tB_extx (T)
0\t1\t0\t0\t-1e-18\t0.1
1e-12\t0.99\t0.01\t0\t-1.1e-18\t0.1
# a comment in the middle
2e-12\t0.98\t0.02\t0\t-1.2e-18\t0.1
";

    fn path() -> &'static Path {
        Path::new("table.txt")
    }

    #[test]
    fn test_raw_columns() {
        let columns = parse_columns_str(TABLE, path(), false).unwrap();
        assert_eq!(columns, vec!["t", "mx", "my", "mz", "E_total", "B_extx"]);
    }

    #[test]
    fn test_renamed_columns_pass_unknown_through() {
        let columns = parse_columns_str(TABLE, path(), true).unwrap();
        assert_eq!(columns, vec!["t", "mx", "my", "mz", "E", "B_extx"]);
    }

    #[test]
    fn test_rows_skip_comments() {
        let rows = parse_rows_str(TABLE, path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec![2e-12, 0.98, 0.02, 0.0, -1.2e-18, 0.1]);
    }

    #[test]
    fn test_parse_table() {
        let table = parse_str(TABLE, path(), true).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 6);
        assert!(table.units.is_none());
        assert_eq!(table.column_values("E"), Some(vec![-1e-18, -1.1e-18, -1.2e-18]));
    }

    #[test]
    fn test_invalid_number() {
        let content = "# t (s)\tmx ()\n0\tx\n";
        let err = parse_str(content, path(), true).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_empty_file() {
        let err = parse_str("", path(), true).unwrap_err();
        assert!(matches!(err, Error::MissingHeader { .. }));
    }
}
