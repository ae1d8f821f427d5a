pub mod browser;
pub mod local;
pub mod utils;

pub use browser::FileBrowser;

use serde::{Deserialize, Serialize};

/// A file or directory entry returned by file browsing operations.
///
/// Field names are serialized as camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    /// ISO 8601 timestamp.
    pub modified: String,
    /// Unix "rwxrwxrwx" format, `None` when not available.
    pub permissions: Option<String>,
}
