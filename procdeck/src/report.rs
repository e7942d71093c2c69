//! `--dry-run`: acquire every host once and describe what came back.

use std::fmt::Write as _;

use procdeck_core::{roster::HostRoster, AdmitError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HostReport {
    pub name: String,
    pub kind: &'static str,
    pub processes: usize,
    pub refreshed_at: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RejectedHost {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct DryRunReport {
    pub hosts: Vec<HostReport>,
    pub rejected: Vec<RejectedHost>,
}

impl DryRunReport {
    pub fn collect(roster: &HostRoster, rejected: &[(String, AdmitError)]) -> Self {
        let hosts = roster
            .iter()
            .map(|h| HostReport {
                name: h.name().to_string(),
                kind: if h.is_local() { "local" } else { "remote" },
                processes: h.snapshot().len(),
                refreshed_at: h.refreshed_at().map(|t| t.to_rfc3339()),
                error: h.last_error().map(str::to_string),
            })
            .collect();
        let rejected = rejected
            .iter()
            .map(|(name, e)| RejectedHost {
                name: name.clone(),
                reason: e.to_string(),
            })
            .collect();
        Self { hosts, rejected }
    }

    /// Hosts that were requested but produced no listing.
    pub fn failures(&self) -> usize {
        self.rejected.len() + self.hosts.iter().filter(|h| h.error.is_some()).count()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for h in &self.hosts {
            match &h.error {
                None => {
                    let _ = writeln!(
                        out,
                        "{:<24} {:<6} {:>6} processes",
                        h.name, h.kind, h.processes
                    );
                }
                Some(e) => {
                    let _ = writeln!(out, "{:<24} {:<6} FAILED: {e}", h.name, h.kind);
                }
            }
        }
        for r in &self.rejected {
            let _ = writeln!(out, "{:<24} {:<6} NOT CONNECTED: {}", r.name, "remote", r.reason);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_core::RosterError;

    #[test]
    fn rejected_hosts_count_as_failures() {
        let roster = HostRoster::new();
        let rejected = vec![(
            "db9".to_string(),
            AdmitError::Roster(RosterError::Duplicate("db9".into())),
        )];
        let report = DryRunReport::collect(&roster, &rejected);
        assert_eq!(report.failures(), 1);
        assert!(report.to_text().contains("NOT CONNECTED"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rejected"][0]["name"], "db9");
        assert!(json["hosts"].as_array().unwrap().is_empty());
    }
}
