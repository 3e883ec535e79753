//! Validate specs
//!
//! Validation checks configuration against the provider without opening.

use crate::prelude::*;

#[test]
fn valid_configuration_passes() {
    let temp = Project::empty();
    temp.file("main.toml", TOKENS);
    temp.eph()
        .args(&["validate", "main.toml"])
        .passes()
        .stdout_eq("Configuration is valid (2 ephemeral resources).\n");
}

#[test]
fn unsupported_argument_is_reported_with_location() {
    let temp = Project::empty();
    temp.file(
        "main.toml",
        "[ephemeral.demo_token.api.config]\ncolour = \"blue\"\n",
    );
    temp.eph()
        .args(&["validate", "main.toml"])
        .fails()
        .stderr_has("Error: Unsupported argument")
        .stderr_has("main.toml:2");
}

#[test]
fn provider_validation_errors_fail() {
    let temp = Project::empty();
    temp.file(
        "main.toml",
        "[ephemeral.demo_token.api.config]\nttl_seconds = 0\n",
    );
    temp.eph()
        .args(&["validate", "main.toml"])
        .fails()
        .stderr_has("Invalid lease length")
        .stderr_has("attribute .ttl_seconds");
}
