//! Local directory walking used when mirroring a tree to the server.

use std::path::Path;

use super::utils::{chrono_from_epoch, normalize_path_separators};
use super::FileEntry;

/// List local directory contents, filtering out `.` and `..`.
///
/// Results are sorted with directories first, then by name (case-insensitive).
pub fn list_dir_sync(path: &Path) -> Result<Vec<FileEntry>, std::io::Error> {
    let mut result = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        if name == "." || name == ".." {
            continue;
        }

        let metadata = entry.metadata()?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| chrono_from_epoch(d.as_secs()))
            .unwrap_or_default();

        result.push(FileEntry {
            name,
            path: normalize_path_separators(&entry.path().to_string_lossy()),
            is_directory: metadata.is_dir(),
            size: metadata.len(),
            modified,
            permissions: get_permissions(&metadata),
        });
    }

    result.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(result)
}

#[cfg(unix)]
fn get_permissions(metadata: &std::fs::Metadata) -> Option<String> {
    use super::utils::format_permissions;
    use std::os::unix::fs::PermissionsExt;
    Some(format_permissions(metadata.permissions().mode()))
}

#[cfg(not(unix))]
fn get_permissions(_metadata: &std::fs::Metadata) -> Option<String> {
    None
}
