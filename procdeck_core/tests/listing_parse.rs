//! Remote listing parser behaviour on realistic `ps` output.

use procdeck_core::remote::{acquire_remote, parse_listing, LISTING_COMMAND};
use procdeck_core::session::RemoteSession;
use procdeck_core::ExecError;

const HEADER: &str = "USER         PID %CPU %MEM    VSZ   RSS STAT ELAPSED COMMAND";

#[test]
fn malformed_row_is_dropped() {
    let text = format!(
        "{HEADER}\n\
         root           1  0.0  0.1 168940 13056 Ss      86400 systemd\n\
         postgres     911  1.2  4.8 215000 98000 S        3600 postgres\n\
         daemon       944  0.0\n"
    );
    let snap = parse_listing(&text);
    assert_eq!(snap.len(), 2);
    let pids: Vec<u32> = snap.entries().iter().map(|p| p.pid).collect();
    assert_eq!(pids, [1, 911]);
    assert_eq!(snap.entries()[1].user, "postgres");
    assert_eq!(snap.entries()[1].rss_kb, 98000);
    assert_eq!(snap.entries()[1].cpu_load, 1.2);
    assert_eq!(snap.entries()[1].cpu_ticks, 0);
}

#[test]
fn header_only_is_empty_not_an_error() {
    assert!(parse_listing(&format!("{HEADER}\n")).is_empty());
}

#[test]
fn parsing_is_deterministic() {
    let text = format!(
        "{HEADER}\n\
         alice   2001  15.0  6.2 3100000 410000 Rl   42 Isolated Web Co\n\
         bob     2002   0.3  0.4  250000  30000 T    10 vim\n"
    );
    let a = parse_listing(&text);
    let b = parse_listing(&text);
    assert_eq!(a.entries(), b.entries());
    assert_eq!(a.entries()[0].command, "Isolated Web Co");
    assert_eq!(a.entries()[1].state, 'T');
}

#[test]
fn rows_keep_output_order() {
    let text = format!(
        "{HEADER}\n\
         u 30 0 0 1 1 S 1 c\n\
         u 10 0 0 1 1 S 1 a\n\
         u 20 0 0 1 1 S 1 b\n"
    );
    let cmds: Vec<String> = parse_listing(&text)
        .entries()
        .iter()
        .map(|p| p.command.clone())
        .collect();
    assert_eq!(cmds, ["c", "a", "b"]);
}

struct Canned(Option<Result<String, ExecError>>, Vec<String>);

impl RemoteSession for Canned {
    fn run(&mut self, command: &str) -> Result<String, ExecError> {
        self.1.push(command.to_string());
        self.0.take().unwrap_or(Err(ExecError::Closed))
    }

    fn disconnect(&mut self) {}
}

#[test]
fn acquire_runs_listing_command() {
    let mut session = Canned(
        Some(Ok(format!("{HEADER}\nroot 1 0.0 0.1 1 1 S 5 init\n"))),
        vec![],
    );
    let snap = acquire_remote(&mut session).unwrap();
    assert_eq!(snap.len(), 1);
    assert_eq!(session.1, [LISTING_COMMAND]);

    let err = acquire_remote(&mut session).unwrap_err();
    assert!(matches!(err, ExecError::Closed));
}
