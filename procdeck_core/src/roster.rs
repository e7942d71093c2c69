//! Host roster: every monitored machine, its session and its latest snapshot.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::config::HostDescriptor;
use crate::error::{AcquisitionError, AdmitError, ConnectionError, ExecError, RosterError};
use crate::local::LocalTable;
use crate::remote::acquire_remote;
use crate::session::RemoteSession;
use crate::types::Snapshot;

/// One local machine plus up to [`MAX_REMOTE_HOSTS`] remote ones.
pub const ROSTER_CAPACITY: usize = 33;
pub const MAX_REMOTE_HOSTS: usize = 32;

pub struct RemoteHost {
    pub address: String,
    pub port: u16,
    pub session: Box<dyn RemoteSession>,
}

pub enum HostKind {
    Local(LocalTable),
    Remote(RemoteHost),
}

impl HostKind {
    pub fn is_local(&self) -> bool {
        matches!(self, HostKind::Local(_))
    }
}

pub struct HostEntry {
    name: String,
    kind: HostKind,
    snapshot: Snapshot,
    refreshed_at: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl HostEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &HostKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut HostKind {
        &mut self.kind
    }

    pub fn is_local(&self) -> bool {
        self.kind.is_local()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Wall clock time of the last successful acquisition.
    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Error of the most recent refresh attempt, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Outcome of one `refresh_all` pass over the non-fatal hosts.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub failed: Vec<(String, ExecError)>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct HostRoster {
    entries: Vec<HostEntry>,
    capacity: usize,
}

impl HostRoster {
    pub fn new() -> Self {
        Self::with_capacity(ROSTER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(ROSTER_CAPACITY)),
            capacity,
        }
    }

    /// Add a host and return its tab index. A Local entry always takes tab 0.
    pub fn add(&mut self, name: impl Into<String>, kind: HostKind) -> Result<usize, RosterError> {
        let name = name.into();
        if self.entries.len() >= self.capacity {
            return Err(RosterError::Capacity(self.capacity));
        }
        if !kind.is_local() && self.remote_count() >= MAX_REMOTE_HOSTS {
            return Err(RosterError::Capacity(MAX_REMOTE_HOSTS));
        }
        if self.entries.iter().any(|e| e.name == name)
            || (kind.is_local() && self.entries.iter().any(HostEntry::is_local))
        {
            return Err(RosterError::Duplicate(name));
        }
        let entry = HostEntry {
            name,
            kind,
            snapshot: Snapshot::default(),
            refreshed_at: None,
            last_error: None,
        };
        if entry.is_local() {
            self.entries.insert(0, entry);
            Ok(0)
        } else {
            self.entries.push(entry);
            Ok(self.entries.len() - 1)
        }
    }

    /// Connect every descriptor with `connect` and add the ones that succeed.
    /// Returns the hosts that were left out and why.
    pub fn admit<F>(
        &mut self,
        descriptors: &[HostDescriptor],
        mut connect: F,
    ) -> Vec<(String, AdmitError)>
    where
        F: FnMut(&HostDescriptor) -> Result<Box<dyn RemoteSession>, ConnectionError>,
    {
        let mut rejected = Vec::new();
        for desc in descriptors {
            if let Some(limit) = self.remote_limit_reached() {
                warn!("{}: roster is full, host ignored", desc.name);
                rejected.push((
                    desc.name.clone(),
                    AdmitError::Roster(RosterError::Capacity(limit)),
                ));
                continue;
            }
            if self.entries.iter().any(|e| e.name == desc.name) {
                warn!("{}: duplicate host entry ignored", desc.name);
                rejected.push((
                    desc.name.clone(),
                    AdmitError::Roster(RosterError::Duplicate(desc.name.clone())),
                ));
                continue;
            }
            match connect(desc) {
                Ok(session) => {
                    let kind = HostKind::Remote(RemoteHost {
                        address: desc.address.clone(),
                        port: desc.port,
                        session,
                    });
                    if let Err(e) = self.add(desc.name.clone(), kind) {
                        rejected.push((desc.name.clone(), AdmitError::Roster(e)));
                    }
                }
                Err(e) => {
                    warn!("{}: {e}", desc.name);
                    rejected.push((desc.name.clone(), AdmitError::Connection(e)));
                }
            }
        }
        rejected
    }

    fn remote_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_local()).count()
    }

    // The limit that stops one more remote entry, if any.
    fn remote_limit_reached(&self) -> Option<usize> {
        if self.entries.len() >= self.capacity {
            Some(self.capacity)
        } else if self.remote_count() >= MAX_REMOTE_HOSTS {
            Some(MAX_REMOTE_HOSTS)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&HostEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut HostEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostEntry> {
        self.entries.iter()
    }

    /// Re-acquire every host in tab order. A snapshot is only replaced when its
    /// acquisition succeeds; a failing remote keeps the previous one. A failing local
    /// walk aborts the pass.
    pub fn refresh_all(&mut self) -> Result<RefreshReport, AcquisitionError> {
        let mut report = RefreshReport::default();
        for entry in &mut self.entries {
            let result = match &mut entry.kind {
                HostKind::Local(table) => Ok(table.acquire()?),
                HostKind::Remote(remote) => acquire_remote(remote.session.as_mut()),
            };
            match result {
                Ok(snapshot) => {
                    debug!("{}: {} processes", entry.name, snapshot.len());
                    entry.snapshot = snapshot;
                    entry.refreshed_at = Some(Local::now());
                    entry.last_error = None;
                    report.refreshed += 1;
                }
                Err(e) => {
                    debug!("{}: refresh failed: {e}", entry.name);
                    entry.last_error = Some(e.to_string());
                    report.failed.push((entry.name.clone(), e));
                }
            }
        }
        Ok(report)
    }

    /// Close every remote session. Called once at shutdown.
    pub fn disconnect_all(&mut self) {
        for entry in &mut self.entries {
            if let HostKind::Remote(remote) = &mut entry.kind {
                remote.session.disconnect();
            }
        }
    }
}

impl Default for HostRoster {
    fn default() -> Self {
        Self::new()
    }
}
