//! Error types for the ftpdeck core crate.
//!
//! [`FtpError`] is what the blocking [`FtpClient`](crate::ftp::FtpClient)
//! reports. [`FileError`] is the narrower vocabulary of the async
//! [`FileBrowser`](crate::files::FileBrowser) capability, and [`CoreError`]
//! wraps both for consumers that want a single error type.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type encompassing all core error categories.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An FTP client error.
    #[error("FTP error: {0}")]
    Ftp(#[from] FtpError),

    /// A file-operation error.
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// A configuration error (invalid values, missing fields, parse failures).
    #[error("Config error: {0}")]
    Config(String),

    /// A low-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the FTP client and its transports.
#[derive(Error, Debug)]
pub enum FtpError {
    /// The control connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server rejected the credentials.
    #[error("Login failed: {0}")]
    Auth(String),

    /// The client holds no live session.
    #[error("Not connected")]
    NotConnected,

    /// A transport primitive failed for protocol or network reasons.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The local source of an upload does not exist.
    #[error("Local file not found: {}", .0.display())]
    LocalFileMissing(PathBuf),

    /// The remote file exceeds the in-memory read ceiling.
    #[error("File too large: {path} is {size} bytes (limit {limit})")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    /// The remote target already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The remote file does not exist (or its size cannot be queried).
    #[error("Remote file not found: {0}")]
    NotFound(String),

    /// A local I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to file browsing and file operations.
#[derive(Error, Debug)]
pub enum FileError {
    /// The requested file or directory was not found.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Permission was denied for the requested operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A file operation failed (I/O error, command failure, etc.).
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// A low-level I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FtpError> for FileError {
    fn from(err: FtpError) -> Self {
        match err {
            FtpError::NotFound(path) => FileError::NotFound(path),
            FtpError::LocalFileMissing(path) => FileError::NotFound(path.display().to_string()),
            FtpError::Auth(msg) => FileError::PermissionDenied(msg),
            FtpError::Io(e) => FileError::Io(e),
            other => FileError::OperationFailed(other.to_string()),
        }
    }
}
