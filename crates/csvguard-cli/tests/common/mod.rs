//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use csvguard_test_utils::temp_dir;
use tempfile::TempDir;

/// Test context with temporary working directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: temp_dir(),
        }
    }

    /// Write `.csvguard/config.yaml` in the working directory
    pub fn with_settings(self, yaml: &str) -> Self {
        let dir = self.path().join(".csvguard");
        std::fs::create_dir_all(&dir).expect("Failed to create settings dir");
        std::fs::write(dir.join("config.yaml"), yaml).expect("Failed to write settings");
        self
    }

    /// Write a file in the working directory and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Read a file from the working directory
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("csvguard").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("CSVGUARD_CONFIG")
            .env_remove("CSVGUARD_LOG_LEVEL")
            .env_remove("CSVGUARD_LOG_FILE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix `text` with the UTF-8 byte-order mark
pub fn with_bom(text: &str) -> String {
    format!("\u{feff}{text}")
}
