//! Conversion of raw `LIST` output into [`FileEntry`] values.
//!
//! Line parsing (UNIX `ls -l` style and DOS/IIS style) is delegated to
//! `suppaftp::list::File`.

use std::str::FromStr;
use std::time::UNIX_EPOCH;

use suppaftp::list::File;
use tracing::debug;

use crate::files::utils::{chrono_from_epoch, is_dot_entry, join_remote};
use crate::files::FileEntry;

/// Parse listing lines of directory `dir` into entries.
///
/// `.`/`..`, `total N` headers and lines the parser does not recognize are
/// dropped.
pub fn parse_entries(dir: &str, lines: &[String]) -> Vec<FileEntry> {
    lines
        .iter()
        .filter_map(|line| match File::from_str(line) {
            Ok(file) => Some(file),
            Err(e) => {
                debug!(line = %line, error = ?e, "Skipping unparseable listing line");
                None
            }
        })
        .filter(|file| !is_dot_entry(file.name()))
        .map(|file| to_entry(dir, &file))
        .collect()
}

fn to_entry(dir: &str, file: &File) -> FileEntry {
    let modified = file
        .modified()
        .duration_since(UNIX_EPOCH)
        .map(|d| chrono_from_epoch(d.as_secs()))
        .unwrap_or_default();

    FileEntry {
        name: file.name().to_string(),
        path: join_remote(dir, file.name()),
        is_directory: file.is_directory(),
        size: file.size() as u64,
        modified,
        permissions: None,
    }
}
