//! Remote shell sessions: run one command, capture its standard output.

use std::{
    io::Read,
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use ssh2::Session;
use tracing::{debug, info, warn};

use crate::config::{HostDescriptor, Protocol};
use crate::error::{ConnectionError, ExecError};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A live authenticated channel to one host. Exclusively owned by its roster entry.
pub trait RemoteSession {
    /// Run `command` and return everything it wrote to stdout. Exit status is not reported.
    fn run(&mut self, command: &str) -> Result<String, ExecError>;

    fn disconnect(&mut self);
}

pub struct SshSession {
    session: Option<Session>,
    label: String,
}

impl SshSession {
    pub fn connect(host: &HostDescriptor) -> Result<Self, ConnectionError> {
        if host.protocol == Protocol::Telnet {
            warn!(
                "{}: telnet is not supported, connecting over ssh to port {}",
                host.name, host.port
            );
        }
        let target = format!("{}:{}", host.address, host.port);
        let addr = (host.address.as_str(), host.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut it| it.next())
            .ok_or_else(|| ConnectionError::Resolve(target.clone()))?;

        let tcp = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|source| {
            ConnectionError::Tcp {
                addr: target.clone(),
                source,
            }
        })?;

        let handshake_err = |source| ConnectionError::Handshake {
            addr: target.clone(),
            source,
        };
        let mut session = Session::new().map_err(handshake_err)?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(handshake_err)?;

        if let Err(e) = session.userauth_password(&host.username, &host.password) {
            debug!("{}: password auth error: {e}", host.name);
        }
        if !session.authenticated() {
            return Err(ConnectionError::Auth {
                user: host.username.clone(),
            });
        }
        info!("connected to {} ({target}) as {}", host.name, host.username);

        Ok(Self {
            session: Some(session),
            label: host.name.clone(),
        })
    }
}

impl RemoteSession for SshSession {
    fn run(&mut self, command: &str) -> Result<String, ExecError> {
        let session = self.session.as_ref().ok_or(ExecError::Closed)?;
        let mut channel = session
            .channel_session()
            .map_err(|e| ExecError::Channel(e.to_string()))?;
        channel
            .exec(command)
            .map_err(|e| ExecError::Channel(e.to_string()))?;

        let out = read_output(&mut channel)?;
        if let Err(e) = channel.wait_close() {
            debug!("{}: channel close: {e}", self.label);
        }
        Ok(out)
    }

    fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.disconnect(None, "procdeck exiting", None) {
                debug!("{}: disconnect: {e}", self.label);
            }
        }
    }
}

/// Drain `reader` to a string; bytes that are not UTF-8 become U+FFFD.
fn read_output<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_with_latin1_bytes_is_kept() {
        let mut raw: &[u8] =
            b"root 1 0.0 0.1 100 10 S 5 caf\xe9d\nwww 2 0.0 0.1 100 10 S 5 nginx\n";
        let out = read_output(&mut raw).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("root 1 "));
        assert!(out.contains("caf\u{fffd}d"));
        assert!(out.ends_with("nginx\n"));
    }
}
