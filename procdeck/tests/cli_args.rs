//! CLI behaviour of the procdeck binary: flags, host files, dry runs.

use std::fs;
use std::process::Output;

use assert_cmd::Command;

fn procdeck(args: &[&str]) -> Output {
    Command::cargo_bin("procdeck")
        .expect("binary built")
        .args(args)
        .env_remove("PROCDECK_LOG")
        .output()
        .expect("run procdeck")
}

fn text(out: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn help_mentions_short_and_long_flags() {
    let out = procdeck(&["--help"]);
    assert!(out.status.success());
    let text = text(&out);
    for flag in [
        "-c", "--remote-config", "-s", "--remote-server", "-l", "--login", "-u", "--username",
        "-p", "--password", "-P", "--port", "-t", "--connection-type", "-a", "--all",
        "--dry-run", "--json",
    ] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn json_requires_dry_run() {
    let out = procdeck(&["--json"]);
    assert!(!out.status.success());
}

#[test]
fn unknown_connection_type_is_rejected() {
    let out = procdeck(&["-s", "db", "-u", "ops", "-p", "x", "-t", "rlogin"]);
    assert!(!out.status.success());
    assert!(text(&out).contains("unknown connection type"));
}

#[test]
fn missing_host_file_is_fatal() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("absent.conf");
    let out = procdeck(&["-c", path.to_str().unwrap(), "--dry-run"]);
    assert!(!out.status.success());
    assert!(text(&out).contains("cannot read host file"), "{}", text(&out));
}

#[test]
fn host_file_without_valid_lines_is_fatal() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("hosts.conf");
    fs::write(
        &path,
        "# comment only\n\nbroken-line\ndb1:10.0.0.5:notaport:alice:pw:ssh\n",
    )
    .unwrap();
    let out = procdeck(&["-c", path.to_str().unwrap(), "--dry-run"]);
    assert!(!out.status.success());
    let text = text(&out);
    assert!(text.contains("does not contain any valid host"), "{text}");
    // bad records are reported, not silently dropped
    assert!(text.contains("line 3"), "{text}");
}

#[test]
fn unreachable_remote_is_fatal_when_no_host_connects() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("hosts.conf");
    // nothing listens on port 1
    fs::write(&path, "nowhere:127.0.0.1:1:ops:pw:ssh\n").unwrap();
    let out = procdeck(&["-c", path.to_str().unwrap(), "--dry-run"]);
    assert!(!out.status.success());
    let text = text(&out);
    assert!(text.contains("no remote host could be connected"), "{text}");
    assert!(text.contains("nowhere"), "{text}");
}

#[cfg(target_os = "linux")]
#[test]
fn all_keeps_local_host_when_remotes_fail() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("hosts.conf");
    fs::write(&path, "nowhere:127.0.0.1:1:ops:pw:ssh\n").unwrap();
    let out = procdeck(&["-a", "-c", path.to_str().unwrap(), "--dry-run"]);
    let text = text(&out);
    assert!(!text.contains("no remote host could be connected"), "{text}");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("local"), "{stdout}");
    assert!(stdout.contains("processes"), "{stdout}");
    assert!(stdout.contains("nowhere"), "{stdout}");
    assert!(stdout.contains("NOT CONNECTED"), "{stdout}");
    // the rejected host still counts against the dry run
    assert!(!out.status.success());
    assert!(text.contains("1 host(s) could not be listed"), "{text}");
}

#[cfg(target_os = "linux")]
#[test]
fn local_dry_run_lists_this_machine() {
    let out = procdeck(&["--dry-run"]);
    assert!(out.status.success(), "{}", text(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("local"));
    assert!(stdout.contains("processes"));
}

#[cfg(target_os = "linux")]
#[test]
fn local_dry_run_json_report() {
    let out = procdeck(&["--dry-run", "--json"]);
    assert!(out.status.success(), "{}", text(&out));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    let hosts = report["hosts"].as_array().unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0]["kind"], "local");
    assert!(hosts[0]["processes"].as_u64().unwrap() > 0);
    assert!(hosts[0]["error"].is_null());
    assert!(report["rejected"].as_array().unwrap().is_empty());
}
