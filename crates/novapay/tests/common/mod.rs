//! # Test Utilities for the `novapay` binary
//!
//! - [`Sandbox`] - A temporary NovaPay home with helpers to run the binary in it
//! - [`fixture`] - Read a PEM fixture from `novapay-crypto`'s test fixtures

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Passphrase of `merchant_encrypted.pem`.
pub const FIXTURE_PASSPHRASE: &str = "merchant-fixture-pass";

/// Read a fixture file shared with `novapay-crypto`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../novapay-crypto/tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

/// A temporary home directory for one test.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the sandbox.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write sandbox file");
        path
    }

    /// `novapay --home <sandbox>` with no passphrase in the environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_novapay"));
        cmd.arg("--home")
            .arg(self.dir.path())
            .env_remove("NOVAPAY_PASSPHRASE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run with `args`, optionally providing `NOVAPAY_PASSPHRASE`.
    pub fn run(&self, args: &[&str], passphrase: Option<&str>) -> Output {
        let mut cmd = self.command();
        cmd.args(args);
        if let Some(passphrase) = passphrase {
            cmd.env("NOVAPAY_PASSPHRASE", passphrase);
        }
        cmd.output().expect("novapay runs")
    }
}

/// Trimmed stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
