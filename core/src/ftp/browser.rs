//! FTP-backed file browser implementing [`FileBrowser`].
//!
//! Connects lazily on first use and reuses the session for subsequent
//! operations, reconnecting if the server dropped it. Blocking client calls
//! are offloaded to `tokio::task::spawn_blocking` so the async executor is
//! never blocked on network I/O.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::config::FtpConfig;
use crate::errors::{FileError, FtpError};
use crate::files::utils::split_remote;
use crate::files::{FileBrowser, FileEntry};

use super::client::FtpClient;
use super::transport::FtpConnector;

type SharedClient<C> = Arc<Mutex<Option<FtpClient<<C as FtpConnector>::Transport>>>>;

/// Async file browser over one lazily opened FTP session.
pub struct FtpFileBrowser<C: FtpConnector> {
    connector: Arc<C>,
    config: FtpConfig,
    state: SharedClient<C>,
}

impl<C> FtpFileBrowser<C>
where
    C: FtpConnector + 'static,
    C::Transport: 'static,
{
    pub fn new(connector: C, config: FtpConfig) -> Self {
        Self {
            connector: Arc::new(connector),
            config,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a live session is currently held.
    pub fn is_connected(&self) -> bool {
        self.state
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|c| c.is_live()))
            .unwrap_or(false)
    }

    /// Close the held session, if any. The next operation reconnects.
    pub async fn disconnect(&self) -> Result<(), FileError> {
        let state = self.state.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = state
                .lock()
                .map_err(|e| FileError::OperationFailed(format!("Lock failed: {e}")))?;
            if let Some(mut client) = guard.take() {
                client.close();
            }
            Ok(())
        })
        .await
        .map_err(|e| FileError::OperationFailed(format!("Task join failed: {e}")))?
    }

    /// Run `op` on a blocking thread against a connected client.
    async fn run<R, F>(&self, op: F) -> Result<R, FileError>
    where
        R: Send + 'static,
        F: FnOnce(&mut FtpClient<C::Transport>) -> Result<R, FileError> + Send + 'static,
    {
        let state = self.state.clone();
        let connector = self.connector.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = state
                .lock()
                .map_err(|e| FileError::OperationFailed(format!("Lock failed: {e}")))?;

            if !guard.as_ref().is_some_and(|c| c.is_live()) {
                let client = FtpClient::connect(connector.as_ref(), &config).map_err(|e| {
                    FileError::OperationFailed(format!("FTP connection failed: {e}"))
                })?;
                *guard = Some(client);
            }

            let client = guard
                .as_mut()
                .ok_or(FileError::OperationFailed("FTP not connected".to_string()))?;
            op(client)
        })
        .await
        .map_err(|e| FileError::OperationFailed(format!("Task join failed: {e}")))?
    }
}

#[async_trait::async_trait]
impl<C> FileBrowser for FtpFileBrowser<C>
where
    C: FtpConnector + 'static,
    C::Transport: 'static,
{
    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, FileError> {
        let path = path.to_string();
        self.run(move |client| Ok(client.list_entries(&path)?)).await
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FileError> {
        let path = path.to_string();
        self.run(move |client| Ok(client.read_file(&path)?)).await
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FileError> {
        let path = path.to_string();
        let data = data.to_vec();
        self.run(move |client| Ok(client.save_file(&path, &data)?))
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), FileError> {
        let path = path.to_string();
        self.run(move |client| match client.delete_file(&path) {
            Ok(()) => Ok(()),
            Err(FtpError::NotConnected) => Err(FtpError::NotConnected.into()),
            // Not a plain file; remove it as a directory tree.
            Err(e) => {
                debug!(path = %path, error = %e, "File delete failed, trying directory delete");
                Ok(client.delete_dir(&path)?)
            }
        })
        .await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), FileError> {
        let from = from.to_string();
        let to = to.to_string();
        self.run(move |client| Ok(client.rename(&from, &to)?)).await
    }

    async fn stat(&self, path: &str) -> Result<FileEntry, FileError> {
        let path = path.to_string();
        self.run(move |client| {
            let (parent, name) = split_remote(&path);
            let entry = client
                .list_entries(&parent)?
                .into_iter()
                .find(|entry| entry.name == name)
                .ok_or_else(|| FileError::NotFound(path.clone()))?;
            Ok(FileEntry { path, ..entry })
        })
        .await
    }
}
