//! Entry point for procdeck: resolves hosts, builds the roster and runs the TUI.

mod app;
mod cli;
mod hosts;
mod report;
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use procdeck_core::{
    config::HostDescriptor,
    local::LocalTable,
    manager::Manager,
    roster::{HostKind, HostRoster},
    session::{RemoteSession, SshSession},
    AdmitError,
};
use sysinfo::System;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::report::DryRunReport;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("PROCDECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn local_name() -> String {
    System::host_name().unwrap_or_else(|| "localhost".into())
}

type Rejected = Vec<(String, AdmitError)>;

/// Local entry (when wanted) plus every remote that connected.
///
/// Remote-only runs fail when no remote connects. With `--all` the local
/// tab is enough to keep going and the rejected hosts are only reported.
fn build_roster(args: &Args, remotes: &[HostDescriptor]) -> Result<(HostRoster, Rejected)> {
    let mut roster = HostRoster::new();
    if args.wants_local() {
        roster.add(local_name(), HostKind::Local(LocalTable::default()))?;
    }
    let rejected = roster.admit(remotes, |desc| {
        SshSession::connect(desc).map(|s| Box::new(s) as Box<dyn RemoteSession>)
    });
    if roster.is_empty() {
        let why = rejected
            .iter()
            .map(|(name, e)| format!("{name}: {e}"))
            .collect::<Vec<_>>()
            .join("; ");
        bail!("no remote host could be connected ({why})");
    }
    info!("watching {} host(s)", roster.len());
    Ok((roster, rejected))
}

fn dry_run(args: &Args, mut roster: HostRoster, rejected: &[(String, AdmitError)]) -> Result<()> {
    let refreshed = roster.refresh_all();
    let report = DryRunReport::collect(&roster, rejected);
    roster.disconnect_all();
    refreshed?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    let failed = report.failures();
    if failed > 0 {
        bail!("{failed} host(s) could not be listed");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let remotes = hosts::remote_descriptors(&args)?;
    let (roster, rejected) = build_roster(&args, &remotes)?;
    for (name, e) in &rejected {
        warn!("{name} left out: {e}");
    }

    if args.dry_run {
        return dry_run(&args, roster, &rejected);
    }

    let mut manager = Manager::new(roster);
    // First pass before the screen switches so a broken process table fails in plain text.
    manager.refresh().context("initial refresh")?;
    app::run(&mut manager).await
}
