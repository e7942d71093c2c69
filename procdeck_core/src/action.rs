//! Action router: turns pause/continue/terminate/force-kill into a signal delivery on
//! the active host.

use std::{fmt, path::Path};

use thiserror::Error;
use tracing::debug;

use crate::local;
use crate::roster::{HostKind, HostRoster};
use crate::selection::SelectionState;
use crate::types::ProcessEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Stop,
    Cont,
    Term,
    Kill,
}

impl Signal {
    /// Name as accepted by `kill -<NAME>`.
    pub fn name(self) -> &'static str {
        match self {
            Signal::Stop => "STOP",
            Signal::Cont => "CONT",
            Signal::Term => "TERM",
            Signal::Kill => "KILL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG{}", self.name())
    }
}

/// User-facing control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Pause,
    Continue,
    Terminate,
    ForceKill,
}

impl ControlAction {
    pub fn signal(self) -> Signal {
        match self {
            ControlAction::Pause => Signal::Stop,
            ControlAction::Continue => Signal::Cont,
            ControlAction::Terminate => Signal::Term,
            ControlAction::ForceKill => Signal::Kill,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ControlAction::Pause => "paused",
            ControlAction::Continue => "resumed",
            ControlAction::Terminate => "terminated",
            ControlAction::ForceKill => "killed",
        }
    }
}

/// Outcome of a dispatch, shown to the user as a transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub ok: bool,
    pub message: String,
}

impl ActionResult {
    fn ok(message: String) -> Self {
        Self { ok: true, message }
    }

    fn failed(message: String) -> Self {
        Self { ok: false, message }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("no such process")]
    NoSuchProcess,
    #[error("os error {0}")]
    Os(i32),
}

/// Send the signal for `action` to the selected process of the active host.
/// Never fails: every outcome is reported through the returned [`ActionResult`].
pub fn dispatch(
    action: ControlAction,
    roster: &mut HostRoster,
    selection: &SelectionState,
) -> ActionResult {
    let Some(host) = roster.get_mut(selection.active_host()) else {
        return ActionResult::failed("no host selected".into());
    };
    let Some(target) = host.snapshot().get(selection.selected_row()).cloned() else {
        return ActionResult::failed("process not found".into());
    };
    let signal = action.signal();
    let host_name = host.name().to_string();
    debug!("{host_name}: {signal} -> pid {}", target.pid);

    let outcome = match host.kind_mut() {
        HostKind::Local(table) => signal_local(table.root(), &target, signal),
        HostKind::Remote(remote) => signal_remote(remote.session.as_mut(), target.pid, signal),
    };
    match outcome {
        Ok(()) => ActionResult::ok(format!(
            "{} ({}) {} on {host_name}",
            target.command,
            target.pid,
            action.verb()
        )),
        Err(reason) => ActionResult::failed(format!(
            "{signal} to {} ({}) on {host_name} failed: {reason}",
            target.command, target.pid
        )),
    }
}

fn signal_local(root: &Path, target: &ProcessEntry, signal: Signal) -> Result<(), String> {
    if !local::is_live(root, target.pid) {
        return Err(SignalError::NoSuchProcess.to_string());
    }
    // Same pid, different program: the listed process exited and its pid was reused.
    if let Some(cmd) = local::command_of(root, target.pid) {
        if cmd != target.command {
            return Err(format!("pid now belongs to {cmd}"));
        }
    }
    send_signal(target.pid, signal).map_err(|e| e.to_string())
}

/// Deliver `signal` to a local pid.
#[cfg(target_os = "linux")]
pub fn send_signal(pid: u32, signal: Signal) -> Result<(), SignalError> {
    let pid = libc::pid_t::try_from(pid).map_err(|_| SignalError::NoSuchProcess)?;
    if pid <= 0 {
        // 0 and negative pids address process groups
        return Err(SignalError::NoSuchProcess);
    }
    let raw = match signal {
        Signal::Stop => libc::SIGSTOP,
        Signal::Cont => libc::SIGCONT,
        Signal::Term => libc::SIGTERM,
        Signal::Kill => libc::SIGKILL,
    };
    // SAFETY: kill(2) only reads its arguments.
    let rc = unsafe { libc::kill(pid, raw) };
    if rc == 0 {
        return Ok(());
    }
    match std::io::Error::last_os_error().raw_os_error() {
        Some(libc::EPERM) => Err(SignalError::PermissionDenied),
        Some(libc::ESRCH) => Err(SignalError::NoSuchProcess),
        Some(code) => Err(SignalError::Os(code)),
        None => Err(SignalError::Os(-1)),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn send_signal(_pid: u32, _signal: Signal) -> Result<(), SignalError> {
    Err(SignalError::Os(-1))
}

/// The command run on a remote host. stderr is folded into stdout so the
/// failure text is captured.
pub fn remote_kill_command(pid: u32, signal: Signal) -> String {
    format!("kill -{} {pid} 2>&1", signal.name())
}

fn signal_remote(
    session: &mut dyn crate::session::RemoteSession,
    pid: u32,
    signal: Signal,
) -> Result<(), String> {
    let out = session
        .run(&remote_kill_command(pid, signal))
        .map_err(|e| e.to_string())?;
    match interpret_kill_output(&out) {
        Some(e) => Err(e.to_string()),
        None => Ok(()),
    }
}

/// The remote shell gives us only text. Known failure phrases map to an error;
/// anything else, including empty output, counts as success.
pub fn interpret_kill_output(out: &str) -> Option<SignalError> {
    let lower = out.to_ascii_lowercase();
    if lower.contains("no such process") {
        Some(SignalError::NoSuchProcess)
    } else if lower.contains("operation not permitted") {
        Some(SignalError::PermissionDenied)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_output_classification() {
        assert_eq!(
            interpret_kill_output("bash: kill: (4242) - No such process\n"),
            Some(SignalError::NoSuchProcess)
        );
        assert_eq!(
            interpret_kill_output("kill: (1) - Operation not permitted"),
            Some(SignalError::PermissionDenied)
        );
        assert_eq!(interpret_kill_output(""), None);
        assert_eq!(interpret_kill_output("something unexpected"), None);
    }

    #[test]
    fn remote_command_uses_signal_names() {
        assert_eq!(remote_kill_command(17, Signal::Stop), "kill -STOP 17 2>&1");
        assert_eq!(ControlAction::ForceKill.signal(), Signal::Kill);
        assert_eq!(ControlAction::Continue.signal().to_string(), "SIGCONT");
    }
}
