//! CLI error specs

use crate::prelude::*;

#[test]
fn missing_file_fails() {
    Project::empty()
        .eph()
        .args(&["validate", "nope.toml"])
        .fails()
        .stderr_has("cannot load configuration nope.toml");
}

#[test]
fn malformed_toml_fails() {
    let temp = Project::empty();
    temp.file("main.toml", "[ephemeral.demo_token\n");
    temp.eph().args(&["validate", "main.toml"]).fails();
}

#[test]
fn unknown_subcommand_fails() {
    Project::empty().eph().args(&["destroy"]).fails();
}

#[test]
fn bad_settings_fail() {
    let temp = Project::empty();
    temp.file("main.toml", TOKENS);
    temp.file("settings.toml", "parallelism = 0\n");
    temp.eph()
        .args(&["open", "main.toml", "--settings", "settings.toml"])
        .fails()
        .stderr_has("cannot load settings settings.toml");
}
