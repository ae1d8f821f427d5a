//! Async file browsing capability trait.
//!
//! The blocking [`FtpClient`](crate::ftp::FtpClient) is exposed to async
//! callers through this trait by
//! [`FtpFileBrowser`](crate::ftp::FtpFileBrowser).

use crate::errors::FileError;
use crate::files::FileEntry;

/// Async file browsing capability exposed by remote connections.
#[async_trait::async_trait]
pub trait FileBrowser: Send {
    /// List directory contents at the given path.
    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, FileError>;

    /// Read a file's contents, returning raw bytes.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError>;

    /// Write raw bytes to a file, creating or overwriting it.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FileError>;

    /// Delete a file or directory at the given path.
    async fn delete(&self, path: &str) -> Result<(), FileError>;

    /// Rename or move a file or directory.
    async fn rename(&self, from: &str, to: &str) -> Result<(), FileError>;

    /// Get metadata for a single file or directory.
    async fn stat(&self, path: &str) -> Result<FileEntry, FileError>;
}
