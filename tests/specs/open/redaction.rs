//! Value redaction specs

use crate::prelude::*;

const SECRET: &str = r#"
[ephemeral.demo_token.api.config]
prefix = { sensitive = "s3cret-" }
value = "fixed-token"
"#;

#[test]
fn values_are_redacted_by_default() {
    let temp = Project::empty();
    temp.file("main.toml", SECRET);
    temp.eph()
        .args(&["open", "main.toml"])
        .passes()
        .stdout_has("prefix = (sensitive value)")
        .stdout_has("value = (ephemeral value)")
        .stdout_lacks("fixed-token")
        .stdout_lacks("s3cret-");
}

#[test]
fn show_values_reveals_them() {
    let temp = Project::empty();
    temp.file("main.toml", SECRET);
    temp.eph()
        .args(&["open", "main.toml", "--show-values"])
        .passes()
        .stdout_has(r#"value = "fixed-token""#)
        .stdout_has(r#"prefix = "s3cret-""#);
}

#[test]
fn secrets_never_reach_the_log() {
    let temp = Project::empty();
    temp.file("main.toml", SECRET);
    let output = temp
        .eph()
        .env("EPH_LOG", "trace")
        .args(&["open", "main.toml"])
        .passes();
    assert!(!output.stderr().contains("fixed-token"));
    assert!(!output.stderr().contains("s3cret-"));
}

#[test]
fn run_record_leaves_out_ephemeral_values() {
    let temp = Project::empty();
    temp.file("main.toml", SECRET);
    temp.eph()
        .args(&["open", "main.toml", "--record", "run.txt"])
        .passes();
    let record = std::fs::read_to_string(temp.path().join("run.txt")).expect("read run record");
    assert!(record.contains("ephemeral.demo_token.api = (not recorded)"));
    assert!(record.contains("cannot be written to the run record"));
    assert!(!record.contains("fixed-token"));
    assert!(!record.contains("s3cret-"));
}
