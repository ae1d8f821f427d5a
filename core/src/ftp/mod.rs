//! Connection-bound FTP client.
//!
//! [`FtpClient`] owns exactly one authenticated session and layers directory
//! and file operations over the primitives of an [`FtpTransport`]. The
//! production transport is [`SuppaTransport`] (backed by `suppaftp`);
//! [`FtpFileBrowser`] adapts a client to the async [`FileBrowser`] trait.
//!
//! [`FileBrowser`]: crate::files::FileBrowser

pub mod browser;
pub mod client;
pub mod listing;
pub mod mode;
pub mod suppa;
pub mod transport;

pub use browser::FtpFileBrowser;
pub use client::{FtpClient, MAX_READ_SIZE};
pub use mode::{DataType, TransferMode};
pub use suppa::{SuppaConnector, SuppaTransport};
pub use transport::{FtpConnector, FtpTransport};
