//! Tests that drive the orgchart binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const DOC: &str = r#"
[root]
id = "ceo"
name = "Ada King"
role = "CEO"

[[root.children]]
id = "cto"
name = "Grace Hopper"
role = "CTO"
"#;

fn orgchart_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_orgchart"))
}

/// Run `orgchart` with `args`, feeding `DOC` on stdin
fn run(args: &[&str]) -> Output {
    let mut child = Command::new(orgchart_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn orgchart binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(DOC.as_bytes())
        .expect("write tree document");
    child.wait_with_output().expect("run orgchart binary")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_render_writes_svg_to_stdout() {
    let output = run(&["render"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let svg = String::from_utf8_lossy(&output.stdout);
    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"id="cto""#));
}

#[test]
fn test_debug_logs_placements_at_default_level() {
    let output = run(&["render", "--debug"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let log = stderr(&output);
    assert_eq!(log.matches("Placement").count(), 2, "stderr: {log}");
    assert!(log.contains("key=cto"), "stderr: {log}");
    // only the placement records are raised, not every debug record
    assert!(!log.contains("Computed tree layout"), "stderr: {log}");
}

#[test]
fn test_no_placements_without_debug() {
    let output = run(&["render"]);
    assert!(!stderr(&output).contains("Placement"));
}

#[test]
fn test_toggle_unknown_node_fails() {
    let output = run(&["render", "--toggle", "nobody"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown node 'nobody'"));
}
