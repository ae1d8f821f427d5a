//! Transport abstraction the FTP client is built on.
//!
//! These traits are the boundary to the wire protocol: connecting, login,
//! data-channel negotiation, transfers and listing parsing all live behind
//! them. All methods are **synchronous** and block the calling thread until
//! the server answers or the transport's own timeout fires.
//!
//! Generics over these traits monomorphize at compile time; tests inject a
//! recording in-memory implementation.

use std::io::{Read, Write};

use chrono::NaiveDateTime;

use crate::errors::FtpError;

use super::mode::DataType;

/// Opens control connections (the `connect(host, port)` primitive).
///
/// The associated `Transport` type lets each connector define its own
/// session type without trait-object overhead.
pub trait FtpConnector: Send + Sync {
    /// The session type returned after a successful connect.
    type Transport: FtpTransport;

    /// Open an unauthenticated control connection to `host:port`.
    fn connect(&self, host: &str, port: u16) -> Result<Self::Transport, FtpError>;
}

/// Primitive operations on one open FTP session.
pub trait FtpTransport: Send {
    /// Whether the control connection is still usable.
    ///
    /// Implementations that cannot detect a dropped connection may keep the
    /// default.
    fn is_open(&self) -> bool {
        true
    }

    fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError>;

    /// Select passive (`true`) or active (`false`) data connections.
    fn set_passive(&mut self, passive: bool);

    fn change_dir(&mut self, path: &str) -> Result<(), FtpError>;

    fn make_dir(&mut self, path: &str) -> Result<(), FtpError>;

    /// List `path`: bare names (`NLST`) or raw listing lines (`LIST`).
    fn list(&mut self, path: &str, detailed: bool) -> Result<Vec<String>, FtpError>;

    /// Download `remote` into `dest`, starting at byte `offset`.
    ///
    /// Returns the number of bytes written to `dest`.
    fn get(
        &mut self,
        remote: &str,
        dest: &mut dyn Write,
        data_type: DataType,
        offset: u64,
    ) -> Result<u64, FtpError>;

    /// Upload everything readable from `src` to `remote`, replacing it.
    ///
    /// Returns the number of bytes sent.
    fn put(
        &mut self,
        remote: &str,
        src: &mut dyn Read,
        data_type: DataType,
    ) -> Result<u64, FtpError>;

    fn delete(&mut self, path: &str) -> Result<(), FtpError>;

    fn rmdir(&mut self, path: &str) -> Result<(), FtpError>;

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpError>;

    /// Apply a Unix permission mode (e.g. `0o755`) to `path`.
    fn chmod(&mut self, mode: u32, path: &str) -> Result<(), FtpError>;

    fn size(&mut self, path: &str) -> Result<u64, FtpError>;

    fn modified_time(&mut self, path: &str) -> Result<NaiveDateTime, FtpError>;

    /// Best-effort teardown of the session.
    fn close(&mut self) -> Result<(), FtpError>;
}
