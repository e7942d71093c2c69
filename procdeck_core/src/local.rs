//! Local snapshot builder: walks the kernel process table.

use std::path::{Path, PathBuf};

use crate::error::AcquisitionError;
use crate::types::Snapshot;

pub const PROC_ROOT: &str = "/proc";

// Ticks are divided by this to get the displayed load figure (accumulated CPU time,
// not a share of wall time).
pub const CPU_TICK_SCALE: f32 = 100.0;

/// Where a Local host reads its process table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTable {
    root: PathBuf,
}

impl LocalTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn acquire(&self) -> Result<Snapshot, AcquisitionError> {
        acquire_local(&self.root)
    }
}

impl Default for LocalTable {
    fn default() -> Self {
        Self::new(PROC_ROOT)
    }
}

#[cfg(target_os = "linux")]
pub use linux::{acquire_local, command_of, is_live};

#[cfg(target_os = "linux")]
mod linux {
    use std::{collections::HashMap, fs, path::Path};

    use procfs::process::{all_processes_with_root, Process};
    use sysinfo::Users;
    use tracing::debug;

    use super::CPU_TICK_SCALE;
    use crate::error::AcquisitionError;
    use crate::types::{ProcessEntry, Snapshot};

    pub fn acquire_local(root: &Path) -> Result<Snapshot, AcquisitionError> {
        let procs = all_processes_with_root(root).map_err(|e| AcquisitionError::Unreadable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let users = user_names();
        let page_kb = (sysconf(libc::_SC_PAGESIZE, 4096) / 1024).max(1);
        let hz = sysconf(libc::_SC_CLK_TCK, 100).max(1);
        let uptime = read_uptime(root);

        let mut entries = Vec::new();
        for proc in procs {
            // Anything failing here exited (or is being torn down) during the walk.
            let Ok(proc) = proc else { continue };
            let stat = match proc.stat() {
                Ok(s) => s,
                Err(e) => {
                    debug!("skipping pid {}: {e}", proc.pid());
                    continue;
                }
            };
            let user = match proc.uid() {
                Ok(uid) => users
                    .get(&uid)
                    .cloned()
                    .unwrap_or_else(|| uid.to_string()),
                Err(_) => continue,
            };
            let ticks = stat.utime + stat.stime;
            let elapsed_secs = uptime
                .map(|up| (up - stat.starttime as f64 / hz as f64).max(0.0) as u64)
                .unwrap_or(0);

            entries.push(ProcessEntry {
                pid: stat.pid.max(0) as u32,
                user,
                state: stat.state,
                cpu_load: ticks as f32 / CPU_TICK_SCALE,
                cpu_ticks: ticks,
                mem_percent: None,
                vsize_kb: stat.vsize / 1024,
                rss_kb: stat.rss * page_kb,
                elapsed_secs,
                command: strip_brackets(&stat.comm),
            });
        }
        Ok(Snapshot::new(entries))
    }

    /// True while `pid` still has an entry in the process table at `root`.
    pub fn is_live(root: &Path, pid: u32) -> bool {
        root.join(pid.to_string()).is_dir()
    }

    /// Current command name of `pid`, if it can still be read.
    pub fn command_of(root: &Path, pid: u32) -> Option<String> {
        let proc = Process::new_with_root(root.join(pid.to_string())).ok()?;
        proc.stat().ok().map(|s| strip_brackets(&s.comm))
    }

    fn strip_brackets(comm: &str) -> String {
        comm.trim_start_matches(['(', '['])
            .trim_end_matches([')', ']'])
            .to_string()
    }

    fn user_names() -> HashMap<u32, String> {
        let users = Users::new_with_refreshed_list();
        users
            .list()
            .iter()
            .map(|u| (**u.id(), u.name().to_string()))
            .collect()
    }

    fn read_uptime(root: &Path) -> Option<f64> {
        let text = fs::read_to_string(root.join("uptime")).ok()?;
        text.split_whitespace().next()?.parse().ok()
    }

    fn sysconf(name: libc::c_int, fallback: u64) -> u64 {
        // SAFETY: sysconf has no preconditions; it returns -1 for unknown names.
        let v = unsafe { libc::sysconf(name) };
        if v > 0 {
            v as u64
        } else {
            fallback
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub fn acquire_local(_root: &Path) -> Result<Snapshot, AcquisitionError> {
    Err(AcquisitionError::Unsupported)
}

#[cfg(not(target_os = "linux"))]
pub fn is_live(root: &Path, pid: u32) -> bool {
    root.join(pid.to_string()).is_dir()
}

#[cfg(not(target_os = "linux"))]
pub fn command_of(_root: &Path, _pid: u32) -> Option<String> {
    None
}
