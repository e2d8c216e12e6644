//! Table file formats and read options

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported table file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// OOMMF data table (`.odt`): qualified column names and a units line
    Odt,
    /// mumax3 table (`table.txt`): one tab-separated header line
    Mumax,
}

impl Format {
    /// Pick a format from the file extension, falling back to the first line.
    pub fn detect(path: &Path, first_line: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("odt") => Format::Odt,
            Some(ext) if ext.eq_ignore_ascii_case("txt") => Format::Mumax,
            _ if first_line.starts_with("# ODT") => Format::Odt,
            _ => Format::Mumax,
        }
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Format::Odt => "odt",
            Format::Mumax => "mumax",
        }
    }
}

/// Options for reading a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Replace raw column names with their canonical short names
    pub rename: bool,
    /// Force a format instead of detecting it
    pub format: Option<Format>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            rename: true,
            format: None,
        }
    }
}

impl ReadOptions {
    /// Options with the given rename flag and detected format
    pub fn rename(rename: bool) -> Self {
        Self {
            rename,
            ..Self::default()
        }
    }

    pub(crate) fn resolve_format(&self, path: &Path, content: &str) -> Format {
        self.format
            .unwrap_or_else(|| Format::detect(path, content.lines().next().unwrap_or("")))
    }
}
