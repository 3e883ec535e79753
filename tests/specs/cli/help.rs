//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .eph()
        .args(&["--help"])
        .passes()
        .stdout_has("validate")
        .stdout_has("open");
}

#[test]
fn open_help_lists_flags() {
    Project::empty()
        .eph()
        .args(&["open", "--help"])
        .passes()
        .stdout_has("--settings")
        .stdout_has("--show-values")
        .stdout_has("--record");
}
