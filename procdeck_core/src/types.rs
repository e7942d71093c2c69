//! Process entries and per-host snapshots.

use serde::Serialize;

/// One process as seen by one acquisition pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub user: String,
    pub state: char,
    // local: ticks / CPU_TICK_SCALE, remote: %CPU as reported by ps
    pub cpu_load: f32,
    // user + kernel ticks (0 for remote hosts)
    pub cpu_ticks: u64,
    // only reported by the remote listing
    pub mem_percent: Option<f32>,
    pub vsize_kb: u64,
    pub rss_kb: u64,
    pub elapsed_secs: u64,
    pub command: String,
}

/// Ordered process entries for exactly one host, in acquisition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    entries: Vec<ProcessEntry>,
}

impl Snapshot {
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn new(entries: Vec<ProcessEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    pub fn get(&self, row: usize) -> Option<&ProcessEntry> {
        self.entries.get(row)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ProcessEntry> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ProcessEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_as_entry_list() {
        let snap: Snapshot = [ProcessEntry {
            pid: 7,
            user: "root".into(),
            state: 'S',
            cpu_load: 0.5,
            cpu_ticks: 50,
            mem_percent: None,
            vsize_kb: 1024,
            rss_kb: 64,
            elapsed_secs: 30,
            command: "init".into(),
        }]
        .into_iter()
        .collect();
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["entries"][0]["pid"], 7);
        assert_eq!(v["entries"][0]["state"], "S");
        assert!(v["entries"][0]["mem_percent"].is_null());
    }
}
