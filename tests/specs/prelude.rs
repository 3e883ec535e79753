//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Two tokens, one generated and one fixed
pub const TOKENS: &str = r#"
[ephemeral.demo_token.api.config]
prefix = "api-"

[ephemeral.demo_token.db.config]
value = "fixed"
"#;

/// A throwaway directory holding configuration files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
    }

    /// An `eph` invocation running inside the project directory
    pub fn eph(&self) -> Cli {
        let mut cmd = Command::cargo_bin("eph").expect("eph binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("EPH_LOG");
        Cli { cmd }
    }
}

/// Builder over a single CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require a zero exit code
    pub fn passes(mut self) -> Output {
        let assert = self.cmd.assert().success();
        Output::from(assert.get_output())
    }

    /// Run and require a non-zero exit code
    pub fn fails(mut self) -> Output {
        let assert = self.cmd.assert().failure();
        Output::from(assert.get_output())
    }
}

/// Captured stdout and stderr of a finished invocation
pub struct Output {
    stdout: String,
    stderr: String,
}

impl From<&std::process::Output> for Output {
    fn from(output: &std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            predicate::str::contains(needle).eval(self.stdout.as_str()),
            "stdout does not contain {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly contains {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            predicate::str::contains(needle).eval(self.stderr.as_str()),
            "stderr does not contain {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }
}
