#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data dir and config for one test
pub struct Household {
    dir: TempDir,
}

impl Household {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let household = Self { dir };
        household.write_config("");
        household
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("write config");
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir().join("wohnheim-tracker.json")
    }

    pub fn write_state(&self, contents: &str) {
        fs::create_dir_all(self.data_dir()).expect("create data dir");
        fs::write(self.state_path(), contents).expect("write state");
    }

    pub fn read_state(&self) -> Value {
        let raw = fs::read_to_string(self.state_path()).expect("read state");
        serde_json::from_str(&raw).expect("parse state")
    }

    /// `hausplan` pointed at this household, with ambient env cleared
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("hausplan").expect("binary");
        cmd.env_remove("HAUSPLAN_DATA_DIR")
            .env_remove("HAUSPLAN_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--config")
            .arg(self.config_path());
        cmd
    }

    /// Run with `--json`, assert success and return `data`
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run hausplan");
        assert!(
            output.status.success(),
            "hausplan {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        let envelope: Value = serde_json::from_slice(&output.stdout).expect("json output");
        assert_eq!(envelope["schema_version"], "hausplan.v1");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }

    /// Add a member and return its id
    pub fn add_member(&self, name: &str) -> String {
        let data = self.json(&["member", "add", name]);
        data["id"].as_str().expect("member id").to_string()
    }
}
