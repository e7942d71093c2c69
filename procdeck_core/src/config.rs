//! Host descriptors: one `name:address:port:username:password:type` record per line.

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_TELNET_PORT: u16 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Ssh,
    // accepted for compatibility; connected through the ssh path
    Telnet,
}

impl Protocol {
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Ssh => DEFAULT_SSH_PORT,
            Protocol::Telnet => DEFAULT_TELNET_PORT,
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(Protocol::Ssh),
            "telnet" => Ok(Protocol::Telnet),
            other => Err(format!("unknown connection type '{other}'")),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Ssh => "ssh",
            Protocol::Telnet => "telnet",
        })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct HostDescriptor {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub protocol: Protocol,
}

impl fmt::Debug for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostDescriptor")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("protocol", &self.protocol)
            .finish()
    }
}

/// Parse one line of a host file. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_descriptor_line(
    line: &str,
    line_no: usize,
) -> Result<Option<HostDescriptor>, ConfigError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let malformed = |reason: String| ConfigError::Malformed {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != 6 {
        return Err(malformed(format!(
            "expected 6 ':'-separated fields, found {}",
            fields.len()
        )));
    }
    let (name, address, port, username, password, kind) = (
        fields[0].trim(),
        fields[1].trim(),
        fields[2].trim(),
        fields[3].trim(),
        fields[4],
        fields[5],
    );
    if name.is_empty() || address.is_empty() || username.is_empty() {
        return Err(malformed("name, address and username must not be empty".into()));
    }
    let protocol: Protocol = kind.parse().map_err(malformed)?;
    let port = if port.is_empty() {
        protocol.default_port()
    } else {
        port.parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| malformed(format!("invalid port '{port}'")))?
    };

    Ok(Some(HostDescriptor {
        name: name.to_string(),
        address: address.to_string(),
        port,
        username: username.to_string(),
        password: password.to_string(),
        protocol,
    }))
}

/// Parse a whole host file body, skipping malformed records with a warning.
pub fn parse_descriptors(text: &str) -> Vec<HostDescriptor> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| match parse_descriptor_line(line, i + 1) {
            Ok(d) => d,
            Err(e) => {
                warn!("skipping host record: {e}");
                None
            }
        })
        .collect()
}

/// Load the host file at `path`. Looser permissions than 0600 only warn; a file
/// without a single valid record is an error.
pub fn load_hosts(path: &Path) -> Result<Vec<HostDescriptor>, ConfigError> {
    check_permissions(path);
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let hosts = parse_descriptors(&text);
    if hosts.is_empty() {
        return Err(ConfigError::NoHosts(path.to_path_buf()));
    }
    Ok(hosts)
}

/// Returns false (after logging a warning) when the file is readable by others.
#[cfg(unix)]
pub fn check_permissions(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.permissions().mode() & 0o777;
            if mode != 0o600 {
                warn!(
                    "host file {} has mode {mode:o}, expected 600 (it stores passwords)",
                    path.display()
                );
                return false;
            }
            true
        }
        // read_to_string reports the real error
        Err(_) => true,
    }
}

#[cfg(not(unix))]
pub fn check_permissions(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_fields_are_parsed() {
        let d = parse_descriptor_line("db1:10.0.0.5:22:alice:secret:ssh", 1)
            .unwrap()
            .unwrap();
        assert_eq!(d.name, "db1");
        assert_eq!(d.address, "10.0.0.5");
        assert_eq!(d.port, 22);
        assert_eq!(d.username, "alice");
        assert_eq!(d.password, "secret");
        assert_eq!(d.protocol, Protocol::Ssh);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        assert!(parse_descriptor_line("# web:1.2.3.4:22:a:b:ssh", 1).unwrap().is_none());
        assert!(parse_descriptor_line("", 2).unwrap().is_none());
        assert!(parse_descriptor_line("   \r\n", 3).unwrap().is_none());
    }

    #[test]
    fn empty_port_uses_protocol_default() {
        let d = parse_descriptor_line("old:10.0.0.9::root:pw:telnet", 1)
            .unwrap()
            .unwrap();
        assert_eq!(d.port, DEFAULT_TELNET_PORT);
        assert_eq!(d.protocol, Protocol::Telnet);
    }

    #[test]
    fn malformed_records_report_line_number() {
        match parse_descriptor_line("db1:10.0.0.5:22:alice", 7) {
            Err(ConfigError::Malformed { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected malformed, got {other:?}"),
        }
        assert!(parse_descriptor_line("db1:10.0.0.5:99999:alice:pw:ssh", 1).is_err());
        assert!(parse_descriptor_line("db1:10.0.0.5:22:alice:pw:rsh", 1).is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let d = parse_descriptor_line("db1:10.0.0.5:22:alice:hunter2:ssh", 1)
            .unwrap()
            .unwrap();
        assert!(!format!("{d:?}").contains("hunter2"));
    }

    #[test]
    fn parse_descriptors_skips_bad_lines() {
        let text = "# fleet\nweb:10.0.0.1:22:ops:pw:ssh\nbroken\n\ndb:10.0.0.2:2222:ops:pw:ssh\n";
        let hosts = parse_descriptors(text);
        let names: Vec<_> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["web", "db"]);
        assert_eq!(hosts[1].port, 2222);
    }
}
