//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use procdeck_core::config::Protocol;

#[derive(Debug, Parser)]
#[command(
    name = "procdeck",
    version,
    about = "Watch and control processes on this machine and on remote hosts, top-style",
    after_help = "With no host flags only local processes are shown.\n\
                  Host file lines: name:address:port:username:password:ssh|telnet"
)]
pub struct Args {
    /// Host file with one remote per line
    #[arg(short = 'c', long = "remote-config", value_name = "PATH")]
    pub remote_config: Option<PathBuf>,

    /// Single remote host to watch
    #[arg(short = 's', long = "remote-server", value_name = "HOST", conflicts_with = "login")]
    pub remote_server: Option<String>,

    /// Single remote host given as USER@HOST
    #[arg(short = 'l', long = "login", value_name = "USER@HOST")]
    pub login: Option<String>,

    #[arg(short = 'u', long, value_name = "USER")]
    pub username: Option<String>,

    /// Password for the single remote host (prompted when missing)
    #[arg(short = 'p', long, value_name = "PASSWORD")]
    pub password: Option<String>,

    #[arg(short = 'P', long, value_name = "PORT")]
    pub port: Option<u16>,

    #[arg(
        short = 't',
        long = "connection-type",
        value_name = "TYPE",
        default_value_t = Protocol::Ssh
    )]
    pub connection_type: Protocol,

    /// Show the local machine next to the remote hosts
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Acquire every host once, print a report and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run report as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl Args {
    /// A single target named on the command line.
    pub fn single_target(&self) -> Option<&str> {
        self.remote_server.as_deref().or(self.login.as_deref())
    }

    pub fn wants_remote(&self) -> bool {
        self.all || self.remote_config.is_some() || self.single_target().is_some()
    }

    pub fn wants_local(&self) -> bool {
        self.all || !self.wants_remote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("procdeck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_is_local_only() {
        let a = parse(&[]);
        assert!(a.wants_local());
        assert!(!a.wants_remote());
        assert_eq!(a.connection_type, Protocol::Ssh);
    }

    #[test]
    fn host_file_alone_drops_local() {
        let a = parse(&["-c", "/tmp/hosts.conf"]);
        assert!(a.wants_remote());
        assert!(!a.wants_local());
        let a = parse(&["--remote-config", "/tmp/hosts.conf", "--all"]);
        assert!(a.wants_remote() && a.wants_local());
    }

    #[test]
    fn single_target_flags() {
        let a = parse(&["-s", "db1", "-u", "ops", "-P", "2222", "-t", "telnet"]);
        assert_eq!(a.single_target(), Some("db1"));
        assert_eq!(a.port, Some(2222));
        assert_eq!(a.connection_type, Protocol::Telnet);

        let a = parse(&["-l", "alice@10.0.0.5"]);
        assert_eq!(a.single_target(), Some("alice@10.0.0.5"));
    }

    #[test]
    fn rejected_combinations() {
        let argv = |extra: &[&'static str]| {
            let mut v = vec!["procdeck"];
            v.extend_from_slice(extra);
            Args::try_parse_from(v)
        };
        assert!(argv(&["-s", "a", "-l", "u@b"]).is_err());
        assert!(argv(&["--json"]).is_err());
        assert!(argv(&["-t", "rsh"]).is_err());
        assert!(argv(&["-P", "70000"]).is_err());
    }
}
