//! odt-core: Core library for parsing and merging micromagnetic simulation tables
//!
//! This library provides functionality to:
//! - Parse OOMMF `.odt` tables (columns, units and data)
//! - Parse mumax3 `table.txt` tables (columns and data)
//! - Rename verbose simulator column names to short canonical names
//! - Merge several tables, stacked or aligned on simulation time
//! - Fourier transform table columns against an independent variable
//! - Export tables as CSV or JSON

pub mod error;
pub mod export;
pub mod format;
pub mod fourier;
pub mod merger;
pub mod mumax;
pub mod odt;
pub mod parser;
pub mod rename;
pub mod scanner;
pub mod table;

pub use error::{Error, Result};
pub use export::{export, write_csv, write_json, ExportFormat};
pub use format::{Format, ReadOptions};
pub use fourier::{FourierSpace, RealspaceX};
pub use merger::{merge, merge_tables, MERGED_TIME_COLUMN};
pub use parser::{parse_columns, parse_rows, parse_str, parse_units, read, read_with};
pub use rename::{rename_column, TIME_COLUMN};
pub use scanner::scan_directory;
pub use table::{Column, Row, Table};
