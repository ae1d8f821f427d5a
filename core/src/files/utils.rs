//! Path and timestamp helpers shared by the FTP client and file browser.

use chrono::{DateTime, Utc};

/// Format seconds since the Unix epoch as an ISO 8601 UTC timestamp.
///
/// Returns an empty string for values chrono cannot represent.
pub fn chrono_from_epoch(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

/// Render the low nine mode bits as `rwxrwxrwx`.
pub fn format_permissions(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

/// Replace backslashes with forward slashes.
pub fn normalize_path_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Return `path` with exactly one trailing `/`.
///
/// `"dir"`, `"dir/"` and `"dir///"` all become `"dir/"`; the root stays `"/"`.
/// An empty path stays empty and never turns into the root.
pub fn with_trailing_slash(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let trimmed = path.trim_end_matches('/');
    format!("{trimmed}/")
}

/// Join a remote directory and an entry name with a single `/`.
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    format!("{}{}", with_trailing_slash(dir), name.trim_start_matches('/'))
}

/// Split a remote path into its parent directory and final component.
///
/// The parent of a top-level relative name is `"."`, the parent of an
/// absolute top-level name is `"/"`.
pub fn split_remote(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/".to_string(), trimmed[1..].to_string()),
        Some(idx) => (trimmed[..idx].to_string(), trimmed[idx + 1..].to_string()),
        None => (".".to_string(), trimmed.to_string()),
    }
}

/// `true` when the last component of `entry` is `.` or `..`.
pub fn is_dot_entry(entry: &str) -> bool {
    let last = entry
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(entry);
    last == "." || last == ".."
}
