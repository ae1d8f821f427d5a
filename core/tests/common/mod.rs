//! Shared test utilities for ftpdeck core integration tests.
//!
//! Provides an in-memory FTP server model ([`MockState`]) behind a
//! recording transport, plus a reachability check for the optional live
//! server tests.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use ftpdeck_core::errors::FtpError;
use ftpdeck_core::ftp::{DataType, FtpClient, FtpConnector, FtpTransport};

pub const USERNAME: &str = "deploy";
pub const PASSWORD: &str = "s3cret";

/// Check if a TCP port is reachable on the given host.
///
/// Returns `true` if a TCP connection can be established within 2 seconds.
pub fn is_port_reachable(host: &str, port: u16) -> bool {
    let addr = format!("{host}:{port}");
    if let Ok(addr) = addr.parse() {
        TcpStream::connect_timeout(&addr, Duration::from_secs(2)).is_ok()
    } else {
        false
    }
}

/// Skip the current test if no FTP server is reachable on the given port.
///
/// Prints a message to stderr and returns early.
macro_rules! require_server {
    ($port:expr) => {
        if !common::is_port_reachable("127.0.0.1", $port) {
            eprintln!(
                "SKIPPED: FTP server not reachable on port {} \
                 (start one with user ftpdeck/ftpdeck)",
                $port
            );
            return;
        }
    };
}
pub(crate) use require_server;

/// Port of the optional live FTP server.
pub const PORT_FTP_LIVE: u16 = 2121;

fn norm(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => "/".to_string(),
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn fail(msg: &str) -> FtpError {
    FtpError::Transport(msg.to_string())
}

/// In-memory server model shared by a connector, its transports and the test.
///
/// All paths are absolute; the root `/` always exists.
#[derive(Debug)]
pub struct MockState {
    pub files: BTreeMap<String, Vec<u8>>,
    pub dirs: BTreeSet<String>,
    /// Every primitive call as `"<primitive> <args>"`, in order.
    pub calls: Vec<String>,
    /// Sizes reported by `size` instead of the real content length.
    pub reported_sizes: HashMap<String, u64>,
    /// Paths on which `delete` fails even if they are files.
    pub fail_delete: HashSet<String>,
    /// Paths on which `rmdir` fails even if they are empty directories.
    pub fail_rmdir: HashSet<String>,
    pub fail_list: bool,
    pub fail_chmod: bool,
    /// `NLST` answers with bare names instead of full paths.
    pub nlst_bare_names: bool,
    pub refuse_connections: bool,
    /// Set when the server side drops the session.
    pub dropped: bool,
    pub passive: Option<bool>,
    pub data_types: Vec<DataType>,
    pub chmods: Vec<(String, u32)>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            dirs: BTreeSet::from(["/".to_string()]),
            calls: Vec::new(),
            reported_sizes: HashMap::new(),
            fail_delete: HashSet::new(),
            fail_rmdir: HashSet::new(),
            fail_list: false,
            fail_chmod: false,
            nlst_bare_names: false,
            refuse_connections: false,
            dropped: false,
            passive: None,
            data_types: Vec::new(),
            chmods: Vec::new(),
        }
    }
}

impl MockState {
    pub fn add_dir(&mut self, path: &str) {
        let path = norm(path);
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push('/');
            current.push_str(part);
            self.dirs.insert(current.clone());
        }
    }

    pub fn add_file(&mut self, path: &str, content: &[u8]) {
        let path = norm(path);
        self.add_dir(&parent_of(&path));
        self.files.insert(path, content.to_vec());
    }

    pub fn exists(&self, path: &str) -> bool {
        let path = norm(path);
        self.files.contains_key(&path) || self.dirs.contains(&path)
    }

    /// Calls whose primitive name equals `primitive`.
    pub fn calls_to(&self, primitive: &str) -> Vec<String> {
        self.calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(primitive))
            .cloned()
            .collect()
    }

    fn children(&self, dir: &str) -> Vec<(String, bool)> {
        let dirs = self
            .dirs
            .iter()
            .filter(|d| d.as_str() != "/" && parent_of(d) == dir)
            .map(|d| (d.clone(), true));
        let files = self
            .files
            .keys()
            .filter(|f| parent_of(f) == dir)
            .map(|f| (f.clone(), false));
        dirs.chain(files).collect()
    }
}

/// Shared handle to a [`MockState`].
#[derive(Debug, Clone, Default)]
pub struct MockServer(Arc<Mutex<MockState>>);

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.0.lock().unwrap()
    }

    pub fn connector(&self) -> MockConnector {
        MockConnector {
            server: self.clone(),
        }
    }

    /// Connect and log in with the valid test credentials.
    pub fn client(&self) -> FtpClient<MockTransport> {
        FtpClient::connect_with(&self.connector(), "ftp.test", USERNAME, PASSWORD, 21, true)
            .expect("mock login should succeed")
    }

    /// Number of recorded primitive calls.
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

pub struct MockConnector {
    server: MockServer,
}

impl FtpConnector for MockConnector {
    type Transport = MockTransport;

    fn connect(&self, host: &str, port: u16) -> Result<MockTransport, FtpError> {
        let mut state = self.server.state();
        state.calls.push(format!("connect {host}:{port}"));
        if state.refuse_connections {
            return Err(FtpError::Connection(format!(
                "{host}:{port}: Connection refused"
            )));
        }
        state.dropped = false;
        Ok(MockTransport {
            server: self.server.clone(),
            closed: false,
        })
    }
}

pub struct MockTransport {
    server: MockServer,
    closed: bool,
}

impl MockTransport {
    fn record(&self, call: String) -> MutexGuard<'_, MockState> {
        let mut state = self.server.state();
        state.calls.push(call);
        state
    }
}

impl FtpTransport for MockTransport {
    fn is_open(&self) -> bool {
        !self.closed && !self.server.state().dropped
    }

    fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError> {
        let _state = self.record(format!("login {username}"));
        if username == USERNAME && password == PASSWORD {
            Ok(())
        } else {
            Err(fail("530 Login incorrect."))
        }
    }

    fn set_passive(&mut self, passive: bool) {
        let mut state = self.record(format!("set_passive {passive}"));
        state.passive = Some(passive);
    }

    fn change_dir(&mut self, path: &str) -> Result<(), FtpError> {
        let state = self.record(format!("change_dir {path}"));
        if state.dirs.contains(&norm(path)) {
            Ok(())
        } else {
            Err(fail("550 No such directory."))
        }
    }

    fn make_dir(&mut self, path: &str) -> Result<(), FtpError> {
        let mut state = self.record(format!("make_dir {path}"));
        let path = norm(path);
        if state.exists(&path) || !state.dirs.contains(&parent_of(&path)) {
            return Err(fail("550 Create directory operation failed."));
        }
        state.dirs.insert(path);
        Ok(())
    }

    fn list(&mut self, path: &str, detailed: bool) -> Result<Vec<String>, FtpError> {
        let state = self.record(format!("list {path} {detailed}"));
        let dir = norm(path);
        if state.fail_list || !state.dirs.contains(&dir) {
            return Err(fail("550 Failed to open directory."));
        }
        let lines = state
            .children(&dir)
            .into_iter()
            .map(|(child, is_dir)| {
                let name = name_of(&child);
                if detailed {
                    let (kind, size) = if is_dir {
                        ('d', 4096)
                    } else {
                        ('-', state.files[&child].len())
                    };
                    format!("{kind}rw-r--r--    1 ftp      ftp      {size:>8} Jan 01  2024 {name}")
                } else if state.nlst_bare_names {
                    name.to_string()
                } else {
                    child.clone()
                }
            })
            .collect();
        Ok(lines)
    }

    fn get(
        &mut self,
        remote: &str,
        dest: &mut dyn Write,
        data_type: DataType,
        offset: u64,
    ) -> Result<u64, FtpError> {
        let mut state = self.record(format!("get {remote} {offset}"));
        state.data_types.push(data_type);
        let content = state
            .files
            .get(&norm(remote))
            .ok_or_else(|| fail("550 Failed to open file."))?;
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(content.len());
        dest.write_all(&content[start..])?;
        Ok((content.len() - start) as u64)
    }

    fn put(
        &mut self,
        remote: &str,
        src: &mut dyn Read,
        data_type: DataType,
    ) -> Result<u64, FtpError> {
        let mut state = self.record(format!("put {remote}"));
        state.data_types.push(data_type);
        let path = norm(remote);
        if !state.dirs.contains(&parent_of(&path)) || state.dirs.contains(&path) {
            return Err(fail("553 Could not create file."));
        }
        let mut content = Vec::new();
        src.read_to_end(&mut content)?;
        let len = content.len() as u64;
        state.files.insert(path, content);
        Ok(len)
    }

    fn delete(&mut self, path: &str) -> Result<(), FtpError> {
        let mut state = self.record(format!("delete {path}"));
        let path = norm(path);
        if state.fail_delete.contains(&path) {
            return Err(fail("550 Permission denied."));
        }
        state
            .files
            .remove(&path)
            .map(|_| ())
            .ok_or_else(|| fail("550 Delete operation failed."))
    }

    fn rmdir(&mut self, path: &str) -> Result<(), FtpError> {
        let mut state = self.record(format!("rmdir {path}"));
        let path = norm(path);
        if path == "/"
            || state.fail_rmdir.contains(&path)
            || !state.dirs.contains(&path)
            || !state.children(&path).is_empty()
        {
            return Err(fail("550 Remove directory operation failed."));
        }
        state.dirs.remove(&path);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpError> {
        let mut state = self.record(format!("rename {from} {to}"));
        let (from, to) = (norm(from), norm(to));
        if !state.dirs.contains(&parent_of(&to)) || state.exists(&to) {
            return Err(fail("553 Rename failed."));
        }
        if let Some(content) = state.files.remove(&from) {
            state.files.insert(to, content);
            return Ok(());
        }
        if !state.dirs.contains(&from) {
            return Err(fail("550 RNFR command failed."));
        }
        let prefix = format!("{from}/");
        let moved_dirs: Vec<String> = state
            .dirs
            .iter()
            .filter(|d| **d == from || d.starts_with(&prefix))
            .cloned()
            .collect();
        for dir in moved_dirs {
            state.dirs.remove(&dir);
            state.dirs.insert(format!("{to}{}", &dir[from.len()..]));
        }
        let moved_files: Vec<String> = state
            .files
            .keys()
            .filter(|f| f.starts_with(&prefix))
            .cloned()
            .collect();
        for file in moved_files {
            if let Some(content) = state.files.remove(&file) {
                state.files.insert(format!("{to}{}", &file[from.len()..]), content);
            }
        }
        Ok(())
    }

    fn chmod(&mut self, mode: u32, path: &str) -> Result<(), FtpError> {
        let mut state = self.record(format!("chmod {mode:o} {path}"));
        if state.fail_chmod || !state.exists(path) {
            return Err(fail("550 SITE CHMOD command failed."));
        }
        state.chmods.push((norm(path), mode));
        Ok(())
    }

    fn size(&mut self, path: &str) -> Result<u64, FtpError> {
        let state = self.record(format!("size {path}"));
        let path = norm(path);
        if let Some(size) = state.reported_sizes.get(&path) {
            return Ok(*size);
        }
        state
            .files
            .get(&path)
            .map(|c| c.len() as u64)
            .ok_or_else(|| fail("550 Could not get file size."))
    }

    fn modified_time(&mut self, path: &str) -> Result<NaiveDateTime, FtpError> {
        let state = self.record(format!("modified_time {path}"));
        if !state.files.contains_key(&norm(path)) {
            return Err(fail("550 Could not get file modification time."));
        }
        Ok(fixed_mtime())
    }

    fn close(&mut self) -> Result<(), FtpError> {
        drop(self.record("close".to_string()));
        self.closed = true;
        Ok(())
    }
}

/// Modification time the mock reports for every file.
pub fn fixed_mtime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .unwrap()
}
