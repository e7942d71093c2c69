//! Which remote hosts to watch: a host file or one target named on the command line.
//! Host file lives under $XDG_CONFIG_HOME/procdeck/hosts.conf
//! (fallback ~/.config/procdeck/hosts.conf).

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use procdeck_core::config::{load_hosts, HostDescriptor};

use crate::cli::Args;

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("procdeck")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("procdeck")
    }
}

pub fn default_hosts_path() -> PathBuf {
    config_dir().join("hosts.conf")
}

/// Split `USER@HOST`. Without an `@` the whole string is the host.
pub fn split_login(login: &str) -> (Option<&str>, &str) {
    match login.rsplit_once('@') {
        Some((user, host)) if !user.is_empty() => (Some(user), host),
        Some((_, host)) => (None, host),
        None => (None, login),
    }
}

/// Remote descriptors requested by `args`; empty when only the local machine is wanted.
pub fn remote_descriptors(args: &Args) -> Result<Vec<HostDescriptor>> {
    if let Some(target) = args.single_target() {
        return single_descriptor(args, target).map(|d| vec![d]);
    }
    if !args.wants_remote() {
        return Ok(Vec::new());
    }
    let path = args
        .remote_config
        .clone()
        .unwrap_or_else(default_hosts_path);
    let hosts = load_hosts(&path)?;
    Ok(hosts)
}

fn single_descriptor(args: &Args, target: &str) -> Result<HostDescriptor> {
    let (login_user, address) = split_login(target);
    if address.is_empty() {
        bail!("no host name in '{target}'");
    }
    let Some(username) = args.username.as_deref().or(login_user) else {
        bail!("no user name for {address}: pass -u USER or -l USER@HOST");
    };
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt_password(&format!("{username}@{address}'s password: "))
            .context("reading password")?,
    };
    let protocol = args.connection_type;
    Ok(HostDescriptor {
        name: address.to_string(),
        address: address.to_string(),
        port: args.port.unwrap_or_else(|| protocol.default_port()),
        username: username.to_string(),
        password,
        protocol,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Typing,
    Done,
    Cancelled,
}

/// Fold one key press into the hidden password buffer.
fn password_key(buf: &mut String, key: KeyEvent) -> Entry {
    if key.kind != KeyEventKind::Press {
        return Entry::Typing;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Entry::Done,
        KeyCode::Esc => Entry::Cancelled,
        KeyCode::Char('c' | 'd') if ctrl => Entry::Cancelled,
        KeyCode::Char('u') if ctrl => {
            buf.clear();
            Entry::Typing
        }
        KeyCode::Char(_) if ctrl => Entry::Typing,
        KeyCode::Char(c) => {
            buf.push(c);
            Entry::Typing
        }
        KeyCode::Backspace => {
            buf.pop();
            Entry::Typing
        }
        _ => Entry::Typing,
    }
}

fn read_hidden() -> io::Result<String> {
    let mut buf = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match password_key(&mut buf, key) {
                Entry::Typing => {}
                Entry::Done => return Ok(buf),
                Entry::Cancelled => {
                    return Err(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "password entry cancelled",
                    ))
                }
            }
        }
    }
}

/// Prompt on stderr and read a password from the terminal without echoing it.
fn prompt_password(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    enable_raw_mode()?;
    let typed = read_hidden();
    disable_raw_mode()?;
    // Enter was swallowed by raw mode
    writeln!(stderr)?;
    typed
}
