//! Open lifecycle specs
//!
//! `eph open` opens every instance, prints the values and closes them.

use crate::prelude::*;

#[test]
fn open_prints_every_instance() {
    let temp = Project::empty();
    temp.file("main.toml", TOKENS);
    temp.eph()
        .args(&["open", "main.toml"])
        .passes()
        .stdout_has("ephemeral.demo_token.api = {")
        .stdout_has("ephemeral.demo_token.db = {");
}

#[test]
fn counted_instances_are_keyed() {
    let temp = Project::empty();
    temp.file(
        "main.toml",
        r#"
[ephemeral.demo_token.worker]
count = 2

[ephemeral.demo_token.worker.config]
prefix = "w{count.index}-"
"#,
    );
    temp.eph()
        .args(&["open", "main.toml", "--show-values"])
        .passes()
        .stdout_has("ephemeral.demo_token.worker[0] = {")
        .stdout_has(r#"value = "w1-"#);
}

#[test]
fn failed_precondition_fails_only_that_instance() {
    let temp = Project::empty();
    temp.file(
        "main.toml",
        r#"
[ephemeral.demo_token.api.config]
prefix = "api-"

[ephemeral.demo_token.blocked.config]
prefix = "b-"

[[ephemeral.demo_token.blocked.precondition]]
condition = false
error_message = "blocked is disabled"
"#,
    );
    temp.eph()
        .args(&["open", "main.toml"])
        .fails()
        .stdout_has("ephemeral.demo_token.api = {")
        .stdout_lacks("ephemeral.demo_token.blocked")
        .stderr_has("Resource precondition failed")
        .stderr_has("blocked is disabled");
}

#[test]
fn settings_file_is_accepted() {
    let temp = Project::empty();
    temp.file("main.toml", TOKENS);
    temp.file("settings.toml", "parallelism = 1\nrenew_early = \"5s\"\n");
    temp.eph()
        .args(&["open", "main.toml", "--settings", "settings.toml"])
        .passes();
}

#[test]
fn logging_goes_to_stderr() {
    let temp = Project::empty();
    temp.file("main.toml", TOKENS);
    temp.eph()
        .env("EPH_LOG", "info")
        .args(&["open", "main.toml"])
        .passes()
        .stderr_has("provider.open");
}
