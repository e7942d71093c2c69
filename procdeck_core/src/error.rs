//! Error taxonomy shared by the engine.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the host-descriptor file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read host file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("host file {0} does not contain any valid host")]
    NoHosts(PathBuf),
}

/// Failure to open an authenticated session to a remote host.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot resolve {0}")]
    Resolve(String),
    #[error("tcp connect to {addr} failed: {source}")]
    Tcp {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ssh handshake with {addr} failed: {source}")]
    Handshake {
        addr: String,
        #[source]
        source: ssh2::Error,
    },
    #[error("authentication as {user} rejected")]
    Auth { user: String },
}

/// The local process table cannot be walked at all. Fatal.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("process table {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("local process listing is only supported on Linux")]
    Unsupported,
}

/// A remote command could not be run or its output not captured.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("cannot open channel: {0}")]
    Channel(String),
    #[error("cannot read command output: {0}")]
    Read(#[from] std::io::Error),
    #[error("session is closed")]
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("host roster is full ({0} hosts)")]
    Capacity(usize),
    #[error("host {0} is already in the roster")]
    Duplicate(String),
}

/// Why a configured host did not make it into the roster.
#[derive(Debug, Error)]
pub enum AdmitError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Conditions that end the refresh loop.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error("terminal error: {0}")]
    Display(#[from] std::io::Error),
}
