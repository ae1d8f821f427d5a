//! The connection-bound FTP client.
//!
//! An [`FtpClient`] is created by connecting, logging in and selecting the
//! data-channel mode; if any of those steps fails no client is returned.
//! Every later operation goes through a single liveness guard: on a client
//! whose session is closed or dropped it fails with
//! [`FtpError::NotConnected`] without touching the transport.
//!
//! The client is meant for serialized use by one caller. Callers needing
//! parallel transfers open one client per session.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::FtpConfig;
use crate::errors::FtpError;
use crate::files::local::list_dir_sync;
use crate::files::utils::{is_dot_entry, join_remote, with_trailing_slash};
use crate::files::FileEntry;

use super::listing::parse_entries;
use super::mode::{DataType, TransferMode};
use super::transport::{FtpConnector, FtpTransport};

/// Largest remote file [`FtpClient::read_file`] buffers in memory (2 MiB).
pub const MAX_READ_SIZE: u64 = 2 * 1024 * 1024;

/// Client owning one authenticated FTP session.
///
/// The session is closed when the client is dropped.
pub struct FtpClient<T: FtpTransport> {
    session: Option<T>,
}

impl<T: FtpTransport> FtpClient<T> {
    /// Connect and log in using the settings in `config`.
    pub fn connect<C>(connector: &C, config: &FtpConfig) -> Result<Self, FtpError>
    where
        C: FtpConnector<Transport = T>,
    {
        Self::connect_with(
            connector,
            &config.host,
            &config.username,
            &config.password,
            config.port,
            config.passive,
        )
    }

    /// Connect to `host:port`, log in and select the data-channel mode.
    ///
    /// Fails with [`FtpError::Connection`] when the server is unreachable
    /// and [`FtpError::Auth`] when the credentials are rejected.
    pub fn connect_with<C>(
        connector: &C,
        host: &str,
        username: &str,
        password: &str,
        port: u16,
        passive: bool,
    ) -> Result<Self, FtpError>
    where
        C: FtpConnector<Transport = T>,
    {
        info!(host, port, "Connecting to FTP server");
        let mut transport = connector
            .connect(host, port)
            .map_err(|e| match e {
                FtpError::Connection(_) => e,
                other => FtpError::Connection(format!("{host}:{port}: {other}")),
            })?;

        if let Err(e) = transport.login(username, password) {
            if let Err(close_err) = transport.close() {
                debug!(error = %close_err, "Closing rejected session failed");
            }
            return Err(match e {
                FtpError::Auth(_) => e,
                other => FtpError::Auth(other.to_string()),
            });
        }
        info!(host, username, "FTP login succeeded");

        transport.set_passive(passive);
        debug!(passive, "Data-channel mode selected");

        Ok(Self {
            session: Some(transport),
        })
    }

    /// Whether the client holds an open, authenticated session.
    pub fn is_live(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_open())
    }

    /// Close the session. Closing a non-live client is a no-op.
    ///
    /// Close failures are logged, never returned.
    pub fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if !session.is_open() {
            return;
        }
        match session.close() {
            Ok(()) => info!("FTP session closed"),
            Err(e) => warn!(error = %e, "Failed to close FTP session cleanly"),
        }
    }

    /// Run `op` against the session if it is live.
    ///
    /// This is the only path to the transport for post-construction
    /// operations.
    fn with_session<R>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut T) -> Result<R, FtpError>,
    ) -> Result<R, FtpError> {
        let session = match self.session.as_mut() {
            Some(session) if session.is_open() => session,
            _ => {
                debug!(op = name, "Rejected: not connected");
                return Err(FtpError::NotConnected);
            }
        };
        op(session).inspect_err(|e| debug!(op = name, error = %e, "FTP operation failed"))
    }

    // --- Navigation & metadata ---

    pub fn change_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.with_session("change_dir", |s| s.change_dir(path))
    }

    /// Size of a remote file in bytes, `None` if it is absent or the server
    /// cannot report it.
    pub fn size(&mut self, path: &str) -> Result<Option<u64>, FtpError> {
        self.with_session("size", |s| Ok(s.size(path).ok()))
    }

    /// Last-modified time of a remote file, `None` if it is absent or the
    /// server cannot report it.
    pub fn modified_time(&mut self, path: &str) -> Result<Option<NaiveDateTime>, FtpError> {
        self.with_session("modified_time", |s| Ok(s.modified_time(path).ok()))
    }

    // --- Directory operations ---

    /// Create a directory, then apply `permissions` if given.
    ///
    /// A failed chmod is logged and does not undo the creation.
    pub fn make_dir(&mut self, path: &str, permissions: Option<u32>) -> Result<(), FtpError> {
        self.with_session("make_dir", |s| s.make_dir(path))?;
        if let Some(mode) = permissions {
            if let Err(e) = self.chmod(path, mode) {
                warn!(path, mode = %format!("{mode:o}"), error = %e, "chmod after mkdir failed");
            }
        }
        Ok(())
    }

    pub fn chmod(&mut self, path: &str, mode: u32) -> Result<(), FtpError> {
        self.with_session("chmod", |s| s.chmod(mode, path))
    }

    /// List a directory as bare names, or as raw listing lines when
    /// `detailed` is set.
    pub fn list_files(&mut self, path: &str, detailed: bool) -> Result<Vec<String>, FtpError> {
        self.with_session("list_files", |s| s.list(path, detailed))
    }

    /// List a directory as parsed entries.
    pub fn list_entries(&mut self, path: &str) -> Result<Vec<FileEntry>, FtpError> {
        let lines = self.list_files(path, true)?;
        Ok(parse_entries(path, &lines))
    }

    /// Delete `path` and everything below it.
    ///
    /// Each listed entry is first deleted as a file; if that fails the entry
    /// is assumed to be a directory and deleted recursively. A file that
    /// cannot be deleted for any other reason (permissions, for instance)
    /// therefore triggers a pointless recursive attempt. Failures below
    /// `path` are logged and skipped; the result is that of removing `path`
    /// itself. An empty `path` is rejected with [`FtpError::NotFound`].
    pub fn delete_dir(&mut self, path: &str) -> Result<(), FtpError> {
        let dir = with_trailing_slash(path);
        if !self.is_live() {
            return Err(FtpError::NotConnected);
        }
        if dir.is_empty() {
            return Err(FtpError::NotFound(String::new()));
        }

        let entries = match self.list_files(&dir, false) {
            Ok(entries) => entries,
            Err(FtpError::NotConnected) => return Err(FtpError::NotConnected),
            Err(e) => {
                warn!(path = %dir, error = %e, "Listing failed, removing directory as-is");
                Vec::new()
            }
        };

        for entry in entries {
            if is_dot_entry(&entry) {
                continue;
            }
            let target = resolve_entry(&dir, &entry);
            if let Err(e) = self.delete_file(&target) {
                debug!(path = %target, error = %e, "File delete failed, recursing as directory");
                if let Err(e) = self.delete_dir(&target) {
                    warn!(path = %target, error = %e, "Recursive delete failed");
                }
            }
        }

        self.with_session("rmdir", |s| s.rmdir(&dir))
    }

    // --- File operations ---

    /// Upload a local file in binary mode.
    pub fn upload(&mut self, local: &Path, remote: &str) -> Result<(), FtpError> {
        self.upload_with_mode(local, remote, TransferMode::Binary)
    }

    /// Upload a local file using `mode`.
    ///
    /// Fails with [`FtpError::LocalFileMissing`], without any transfer, when
    /// `local` is not an existing file.
    pub fn upload_with_mode(
        &mut self,
        local: &Path,
        remote: &str,
        mode: TransferMode,
    ) -> Result<(), FtpError> {
        self.with_session("upload", |s| {
            if !local.is_file() {
                return Err(FtpError::LocalFileMissing(local.to_path_buf()));
            }
            let mut reader = BufReader::new(File::open(local)?);
            let sent = s.put(remote, &mut reader, mode.resolve(remote))?;
            debug!(local = %local.display(), remote, bytes = sent, "Uploaded");
            Ok(())
        })
    }

    /// Download a remote file in binary mode.
    pub fn download(&mut self, remote: &str, local: &Path) -> Result<(), FtpError> {
        self.download_with_mode(remote, local, TransferMode::Binary)
    }

    /// Download a remote file using `mode`, overwriting `local`.
    ///
    /// A remote file whose size cannot be queried counts as absent and fails
    /// with [`FtpError::NotFound`] before any transfer. A partially written
    /// local file is removed when the transfer fails.
    pub fn download_with_mode(
        &mut self,
        remote: &str,
        local: &Path,
        mode: TransferMode,
    ) -> Result<(), FtpError> {
        if self.size(remote)?.is_none() {
            return Err(FtpError::NotFound(remote.to_string()));
        }
        self.with_session("download", |s| {
            let mut writer = BufWriter::new(File::create(local)?);
            let result = s
                .get(remote, &mut writer, mode.resolve(remote), 0)
                .and_then(|received| writer.flush().map(|()| received).map_err(FtpError::from));
            match result {
                Ok(received) => {
                    debug!(remote, local = %local.display(), bytes = received, "Downloaded");
                    Ok(())
                }
                Err(e) => {
                    drop(writer);
                    if let Err(rm_err) = std::fs::remove_file(local) {
                        debug!(local = %local.display(), error = %rm_err, "Cleanup of partial download failed");
                    }
                    Err(e)
                }
            }
        })
    }

    /// Create an empty remote file, refusing to overwrite an existing one.
    pub fn create_file(&mut self, path: &str) -> Result<(), FtpError> {
        if self.size(path)?.is_some() {
            return Err(FtpError::AlreadyExists(path.to_string()));
        }
        self.with_session("create_file", |s| {
            s.put(path, &mut std::io::empty(), DataType::Ascii)
                .map(|_| ())
        })
    }

    pub fn delete_file(&mut self, path: &str) -> Result<(), FtpError> {
        self.with_session("delete_file", |s| s.delete(path))
    }

    /// Rename or move a remote file or directory.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpError> {
        self.with_session("rename", |s| s.rename(from, to))
    }

    /// Move a remote file; identical to [`rename`](Self::rename).
    pub fn move_file(&mut self, from: &str, to: &str) -> Result<(), FtpError> {
        self.rename(from, to)
    }

    /// Read a remote file into memory.
    ///
    /// Files reported larger than [`MAX_READ_SIZE`] are refused with
    /// [`FtpError::FileTooLarge`] before any transfer starts.
    pub fn read_file(&mut self, path: &str) -> Result<Vec<u8>, FtpError> {
        if let Some(size) = self.size(path)? {
            if size > MAX_READ_SIZE {
                return Err(FtpError::FileTooLarge {
                    path: path.to_string(),
                    size,
                    limit: MAX_READ_SIZE,
                });
            }
        }
        self.with_session("read_file", |s| {
            let mut buf = Vec::new();
            s.get(path, &mut buf, DataType::Ascii, 0)?;
            Ok(buf)
        })
    }

    /// Write `content` to a remote file, creating or replacing it.
    pub fn save_file(&mut self, path: &str, content: &[u8]) -> Result<(), FtpError> {
        self.with_session("save_file", |s| {
            let mut scratch = Cursor::new(content);
            s.put(path, &mut scratch, DataType::Ascii).map(|_| ())
        })
    }

    /// Recursively upload the local directory `local_dir` to `remote_dir`.
    ///
    /// Remote directories are created as needed; a directory that cannot be
    /// created is assumed to exist already. Files are sent with
    /// [`TransferMode::Auto`]. Stops at the first failed upload and returns
    /// the number of files uploaded otherwise.
    pub fn mirror(&mut self, local_dir: &Path, remote_dir: &str) -> Result<usize, FtpError> {
        if !self.is_live() {
            return Err(FtpError::NotConnected);
        }
        if !local_dir.is_dir() {
            return Err(FtpError::LocalFileMissing(local_dir.to_path_buf()));
        }

        match self.make_dir(remote_dir, None) {
            Ok(()) => debug!(remote_dir, "Created remote directory"),
            Err(FtpError::NotConnected) => return Err(FtpError::NotConnected),
            Err(e) => debug!(remote_dir, error = %e, "mkdir failed, assuming directory exists"),
        }

        let mut uploaded = 0;
        for entry in list_dir_sync(local_dir)? {
            let local = local_dir.join(&entry.name);
            let remote = join_remote(remote_dir, &entry.name);
            if entry.is_directory {
                uploaded += self.mirror(&local, &remote)?;
            } else {
                self.upload_with_mode(&local, &remote, TransferMode::Auto)?;
                uploaded += 1;
            }
        }
        info!(local = %local_dir.display(), remote_dir, uploaded, "Mirror complete");
        Ok(uploaded)
    }
}

impl<T: FtpTransport> Drop for FtpClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Full remote path of a name listed under `dir`.
///
/// Servers answer `NLST dir/` with either bare names or paths that already
/// include the directory; the latter are used verbatim.
fn resolve_entry(dir: &str, entry: &str) -> String {
    if entry.contains('/') {
        entry.to_string()
    } else {
        join_remote(dir, entry)
    }
}
