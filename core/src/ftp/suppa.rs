//! [`FtpTransport`] over the blocking `suppaftp` stream.

use std::io::{Read, Write};
use std::net::ToSocketAddrs;
use std::time::Duration;

use chrono::NaiveDateTime;
use suppaftp::types::{FileType, FormatControl};
use suppaftp::{FtpError as SuppaError, FtpStream, Mode};
use tracing::debug;

use crate::config::FtpConfig;
use crate::errors::FtpError;

use super::mode::DataType;
use super::transport::{FtpConnector, FtpTransport};

/// Opens plain (non-TLS) FTP control connections.
#[derive(Debug, Clone, Default)]
pub struct SuppaConnector {
    connect_timeout: Option<Duration>,
}

impl SuppaConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on the TCP connect after `timeout`.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl From<&FtpConfig> for SuppaConnector {
    fn from(config: &FtpConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
        }
    }
}

impl FtpConnector for SuppaConnector {
    type Transport = SuppaTransport;

    fn connect(&self, host: &str, port: u16) -> Result<SuppaTransport, FtpError> {
        let stream = match self.connect_timeout {
            Some(timeout) => {
                let addr = (host, port)
                    .to_socket_addrs()
                    .map_err(|e| FtpError::Connection(format!("{host}:{port}: {e}")))?
                    .next()
                    .ok_or_else(|| {
                        FtpError::Connection(format!("{host}:{port}: no address resolved"))
                    })?;
                FtpStream::connect_timeout(addr, timeout)
            }
            None => FtpStream::connect((host, port)),
        }
        .map_err(|e| FtpError::Connection(format!("{host}:{port}: {e}")))?;

        debug!(host, port, "Control connection established");
        Ok(SuppaTransport { stream, open: true })
    }
}

/// One `suppaftp` control connection.
pub struct SuppaTransport {
    stream: FtpStream,
    open: bool,
}

impl SuppaTransport {
    fn set_type(&mut self, data_type: DataType) -> Result<(), FtpError> {
        let file_type = match data_type {
            DataType::Ascii => FileType::Ascii(FormatControl::Default),
            DataType::Binary => FileType::Binary,
        };
        self.stream.transfer_type(file_type).map_err(transport_err)
    }
}

fn transport_err(err: SuppaError) -> FtpError {
    FtpError::Transport(err.to_string())
}

impl FtpTransport for SuppaTransport {
    fn is_open(&self) -> bool {
        self.open
    }

    fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError> {
        self.stream
            .login(username, password)
            .map_err(|e| FtpError::Auth(e.to_string()))
    }

    fn set_passive(&mut self, passive: bool) {
        let mode = if passive { Mode::Passive } else { Mode::Active };
        self.stream.set_mode(mode);
    }

    fn change_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.stream.cwd(path).map_err(transport_err)
    }

    fn make_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.stream.mkdir(path).map_err(transport_err)
    }

    fn list(&mut self, path: &str, detailed: bool) -> Result<Vec<String>, FtpError> {
        let result = if detailed {
            self.stream.list(Some(path))
        } else {
            self.stream.nlst(Some(path))
        };
        result.map_err(transport_err)
    }

    fn get(
        &mut self,
        remote: &str,
        dest: &mut dyn Write,
        data_type: DataType,
        offset: u64,
    ) -> Result<u64, FtpError> {
        self.set_type(data_type)?;
        if offset > 0 {
            let offset = usize::try_from(offset)
                .map_err(|_| FtpError::Transport(format!("offset {offset} out of range")))?;
            self.stream.resume_transfer(offset).map_err(transport_err)?;
        }
        self.stream
            .retr(remote, |reader| {
                std::io::copy(reader, &mut *dest).map_err(SuppaError::ConnectionError)
            })
            .map_err(transport_err)
    }

    fn put(
        &mut self,
        remote: &str,
        mut src: &mut dyn Read,
        data_type: DataType,
    ) -> Result<u64, FtpError> {
        self.set_type(data_type)?;
        self.stream.put_file(remote, &mut src).map_err(transport_err)
    }

    fn delete(&mut self, path: &str) -> Result<(), FtpError> {
        self.stream.rm(path).map_err(transport_err)
    }

    fn rmdir(&mut self, path: &str) -> Result<(), FtpError> {
        self.stream.rmdir(path).map_err(transport_err)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpError> {
        self.stream.rename(from, to).map_err(transport_err)
    }

    fn chmod(&mut self, mode: u32, path: &str) -> Result<(), FtpError> {
        self.stream
            .site(format!("CHMOD {mode:o} {path}"))
            .map(|_| ())
            .map_err(transport_err)
    }

    fn size(&mut self, path: &str) -> Result<u64, FtpError> {
        self.stream
            .size(path)
            .map(|n| n as u64)
            .map_err(transport_err)
    }

    fn modified_time(&mut self, path: &str) -> Result<NaiveDateTime, FtpError> {
        self.stream.mdtm(path).map_err(transport_err)
    }

    fn close(&mut self) -> Result<(), FtpError> {
        self.open = false;
        self.stream.quit().map_err(transport_err)
    }
}
