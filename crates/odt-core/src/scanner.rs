//! Directory scanner for discovering table files

use crate::error::Result;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of OOMMF data tables
const ODT_EXTENSION: &str = "odt";

/// Extension shared by mumax3 tables and the other text files mumax3 writes
const MUMAX_EXTENSION: &str = "txt";

/// File name mumax3 uses for its data table
const MUMAX_TABLE_NAME: &str = "table.txt";

/// Walk one or more directories and collect table files, sorted by path
pub fn scan_directory<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_file() && is_table_file(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!("Found {} table files in {} root(s)", files.len(), roots.len());

    Ok(files)
}

/// `.odt` files always qualify. A `.txt` file qualifies when it is named
/// `table.txt` or its first line is a `# `-prefixed tab-separated header,
/// which keeps mumax3's `log.txt` out of a scan.
fn is_table_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    if ext.eq_ignore_ascii_case(ODT_EXTENSION) {
        return true;
    }
    if !ext.eq_ignore_ascii_case(MUMAX_EXTENSION) {
        return false;
    }

    let named_table = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case(MUMAX_TABLE_NAME));

    named_table || has_mumax_header(path)
}

fn has_mumax_header(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut first = String::new();
    match BufReader::new(file).read_line(&mut first) {
        Ok(_) => is_mumax_header(&first),
        Err(_) => false,
    }
}

fn is_mumax_header(line: &str) -> bool {
    line.starts_with("# ") && line.contains('\t')
}
