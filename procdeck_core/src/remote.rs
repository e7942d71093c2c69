//! Remote snapshot builder: parse the tabular output of `ps` run over a session.

use crate::error::ExecError;
use crate::session::RemoteSession;
use crate::types::{ProcessEntry, Snapshot};

/// Columns: USER PID %CPU %MEM VSZ RSS STAT ELAPSED COMMAND (command is the rest of the line).
pub const LISTING_COMMAND: &str = "ps -eo user,pid,pcpu,pmem,vsz,rss,stat,etimes,comm";

const MIN_COLUMNS: usize = 9;

pub fn acquire_remote(session: &mut dyn RemoteSession) -> Result<Snapshot, ExecError> {
    let out = session.run(LISTING_COMMAND)?;
    Ok(parse_listing(&out))
}

/// Parse listing output. The first line is the header; rows that do not yield every
/// column are dropped.
pub fn parse_listing(text: &str) -> Snapshot {
    text.lines().skip(1).filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<ProcessEntry> {
    let mut cols = line.split_whitespace();
    let user = cols.next()?;
    let pid = cols.next()?.parse::<u32>().ok()?;
    let cpu = cols.next()?.parse::<f32>().ok()?;
    let mem = cols.next()?.parse::<f32>().ok()?;
    let vsz = cols.next()?.parse::<u64>().ok()?;
    let rss = cols.next()?.parse::<u64>().ok()?;
    let state = cols.next()?.chars().next()?;
    let elapsed = cols.next()?.parse::<u64>().ok()?;
    cols.next()?;

    // Keep inner spacing of the command ("Web Content") intact.
    let command = rest_after_columns(line, MIN_COLUMNS - 1)?;

    Some(ProcessEntry {
        pid,
        user: user.to_string(),
        state,
        cpu_load: cpu,
        cpu_ticks: 0,
        mem_percent: Some(mem),
        vsize_kb: vsz,
        rss_kb: rss,
        elapsed_secs: elapsed,
        command: command.trim_end().to_string(),
    })
}

// Slice of `line` starting at the (n+1)-th whitespace-separated column.
fn rest_after_columns(line: &str, n: usize) -> Option<&str> {
    let mut rest = line.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    (!rest.is_empty()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_keeps_inner_spaces() {
        let text = "USER PID %CPU %MEM VSZ RSS STAT ELAPSED COMMAND\n\
                    alice 4242 12.5 3.1 2500000 310000 Sl 3600 Web Content\n";
        let snap = parse_listing(text);
        assert_eq!(snap.len(), 1);
        let p = &snap.entries()[0];
        assert_eq!(p.command, "Web Content");
        assert_eq!(p.state, 'S');
        assert_eq!(p.pid, 4242);
        assert_eq!(p.mem_percent, Some(3.1));
        assert_eq!(p.elapsed_secs, 3600);
    }

    #[test]
    fn non_numeric_columns_drop_the_row() {
        let text = "USER PID %CPU %MEM VSZ RSS STAT ELAPSED COMMAND\n\
                    root abc 0.0 0.0 0 0 S 10 init\n";
        assert!(parse_listing(text).is_empty());
    }

    #[test]
    fn empty_output_is_an_empty_snapshot() {
        assert!(parse_listing("").is_empty());
    }
}
